use trellis_core::Resource;

use crate::path::Path;
use crate::{Board, List};

/// The board and list the user has entered.
///
/// A session is a value: commands never change it in place, they hand back a
/// new one and the owner of the interactive loop swaps it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    current: Option<(Board, Option<List>)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_board(board: Board) -> Self {
        Self {
            current: Some((board, None)),
        }
    }

    pub fn at_list(board: Board, list: List) -> Self {
        Self {
            current: Some((board, Some(list))),
        }
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.current.as_ref().map(|(board, _)| board)
    }

    pub fn current_list(&self) -> Option<&List> {
        self.current.as_ref().and_then(|(_, list)| list.as_ref())
    }

    /// Identifiers of the entered board and list, `""` where nothing is entered.
    pub fn ambient_names(&self) -> (String, String) {
        let board = self
            .current_board()
            .map(Resource::identifier)
            .unwrap_or_default();
        let list = self
            .current_list()
            .map(Resource::identifier)
            .unwrap_or_default();
        (board, list)
    }

    pub fn path(&self) -> Path {
        let (board, list) = self.ambient_names();
        Path::ambient(&board, &list)
    }
}
