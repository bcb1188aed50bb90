//! Path completion for interactive input.
//!
//! Candidates are read through the same repository handle commands write
//! through, so a cached repository never offers names a previous command
//! moved, renamed or archived.

use trellis_core::{Resource, TrellisError, TrellisResult};

use crate::chain::{ResolutionChain, Step};
use crate::operations::Repository;
use crate::path::escape_segment;
use crate::session::Session;

/// Completes the last segment of `partial`.
///
/// Boards and lists complete with a trailing `/`. Names are escaped the way
/// [`Path`](crate::Path) renders them. Unknown parents or
/// malformed input yield no candidates; repository failures are returned.
pub fn complete<R: Repository + ?Sized>(
    repo: &mut R,
    session: &Session,
    partial: &str,
) -> TrellisResult<Vec<String>> {
    let (dir, fragment) = match partial.rfind('/') {
        Some(index) => partial.split_at(index + 1),
        None => ("", partial),
    };

    let mut children: Vec<(String, bool)> = Vec::new();
    let result = ResolutionChain::start(repo)
        .resolve_path(dir, session)
        .on_root(|cx| {
            children = identifiers(cx.repo().get_boards()?, true);
            Ok(Step::Done)
        })
        .find_board()
        .on_board(|cx, board| {
            children = identifiers(cx.repo().get_lists(&board.id)?, true);
            Ok(Step::Done)
        })
        .find_list()
        .on_list(|cx, _, list| {
            children = identifiers(cx.repo().get_cards(&list.id)?, false);
            Ok(Step::Done)
        })
        .find_card()
        .on_card(|cx, _, _, card| {
            children = identifiers(cx.repo().get_comments(&card.id)?, false);
            Ok(Step::Done)
        })
        .finish();

    match result.into_result() {
        Ok(_) => {}
        Err(TrellisError::ResourceNotFound { .. }) | Err(TrellisError::InvalidPath(_)) => {
            return Ok(Vec::new())
        }
        Err(e) => return Err(e),
    }

    Ok(children
        .into_iter()
        .filter(|(name, _)| name.starts_with(fragment))
        .map(|(name, nested)| {
            let suffix = if nested { "/" } else { "" };
            format!("{}{}{}", dir, name, suffix)
        })
        .collect())
}

fn identifiers<T: Resource>(items: Vec<T>, nested: bool) -> Vec<(String, bool)> {
    items
        .iter()
        .map(|item| (escape_segment(&item.identifier()).into_owned(), nested))
        .collect()
}
