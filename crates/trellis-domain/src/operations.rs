use trellis_core::{find_resource, TrellisResult};

use crate::{Board, Card, CardCreate, CardUpdate, Comment, CommentCreate, Label, List};

/// Operations the remote board service exposes.
///
/// All calls are synchronous; a network-backed implementation blocks the
/// caller until the remote answers. Lookup misses are reported as
/// `TrellisError::ResourceNotFound`, transport problems as
/// `TrellisError::RemoteFailure`.
///
/// The `find_*` methods default to a scan of the matching `get_*` result, so a
/// caching wrapper only has to memoise the collections.
#[cfg_attr(test, mockall::automock)]
pub trait Repository {
    fn get_boards(&mut self) -> TrellisResult<Vec<Board>>;

    fn find_board(&mut self, query: &str) -> TrellisResult<Board> {
        let boards = self.get_boards()?;
        find_resource(boards, query)
    }

    fn get_lists(&mut self, board_id: &str) -> TrellisResult<Vec<List>>;

    fn find_list(&mut self, board_id: &str, query: &str) -> TrellisResult<List> {
        let lists = self.get_lists(board_id)?;
        find_resource(lists, query)
    }

    fn get_cards(&mut self, list_id: &str) -> TrellisResult<Vec<Card>>;

    fn find_card(&mut self, list_id: &str, query: &str) -> TrellisResult<Card> {
        let cards = self.get_cards(list_id)?;
        find_resource(cards, query)
    }

    fn get_comments(&mut self, card_id: &str) -> TrellisResult<Vec<Comment>>;

    fn find_comment(&mut self, card_id: &str, comment_id: &str) -> TrellisResult<Comment> {
        let comments = self.get_comments(card_id)?;
        find_resource(comments, comment_id)
    }

    fn get_labels(&mut self, board_id: &str) -> TrellisResult<Vec<Label>>;

    fn create_card(&mut self, create: CardCreate) -> TrellisResult<Card>;

    fn update_card(&mut self, update: CardUpdate) -> TrellisResult<Card>;

    fn create_comment(&mut self, create: CommentCreate) -> TrellisResult<Comment>;
}

impl<R: Repository + ?Sized> Repository for Box<R> {
    fn get_boards(&mut self) -> TrellisResult<Vec<Board>> {
        (**self).get_boards()
    }

    fn find_board(&mut self, query: &str) -> TrellisResult<Board> {
        (**self).find_board(query)
    }

    fn get_lists(&mut self, board_id: &str) -> TrellisResult<Vec<List>> {
        (**self).get_lists(board_id)
    }

    fn find_list(&mut self, board_id: &str, query: &str) -> TrellisResult<List> {
        (**self).find_list(board_id, query)
    }

    fn get_cards(&mut self, list_id: &str) -> TrellisResult<Vec<Card>> {
        (**self).get_cards(list_id)
    }

    fn find_card(&mut self, list_id: &str, query: &str) -> TrellisResult<Card> {
        (**self).find_card(list_id, query)
    }

    fn get_comments(&mut self, card_id: &str) -> TrellisResult<Vec<Comment>> {
        (**self).get_comments(card_id)
    }

    fn find_comment(&mut self, card_id: &str, comment_id: &str) -> TrellisResult<Comment> {
        (**self).find_comment(card_id, comment_id)
    }

    fn get_labels(&mut self, board_id: &str) -> TrellisResult<Vec<Label>> {
        (**self).get_labels(board_id)
    }

    fn create_card(&mut self, create: CardCreate) -> TrellisResult<Card> {
        (**self).create_card(create)
    }

    fn update_card(&mut self, update: CardUpdate) -> TrellisResult<Card> {
        (**self).update_card(update)
    }

    fn create_comment(&mut self, create: CommentCreate) -> TrellisResult<Comment> {
        (**self).create_comment(create)
    }
}
