use serde::{Deserialize, Serialize};
use trellis_core::{Resource, ResourceKind};

use crate::board::BoardId;
use crate::identity;

pub type ListId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub board_id: BoardId,
}

impl List {
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: identity::new_id(),
            name: name.into(),
            board_id: board_id.into(),
        }
    }
}

impl Resource for List {
    const KIND: ResourceKind = ResourceKind::List;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
