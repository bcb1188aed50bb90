//! Read-through cache in front of a [`Repository`].
//!
//! Collections are memoised per parent ID: the board snapshot, lists by board,
//! cards by list and labels by board. A memoised collection stays
//! authoritative until a write through this cache patches it or it is
//! invalidated explicitly. An empty collection is a hit like any other.
//!
//! Card moves evict the card from every other cached list and replace or
//! insert it in the cached collection of its new list, so a moved card is
//! never listed twice and never missing from a list that was already cached.
//!
//! Not synchronised; meant to be owned by a single command loop.

use std::collections::HashMap;

use trellis_core::TrellisResult;

use crate::operations::Repository;
use crate::{Board, Card, CardCreate, CardUpdate, Comment, CommentCreate, Label, List};

pub struct CachedRepository<R> {
    inner: R,
    boards: Option<Vec<Board>>,
    lists: HashMap<String, Vec<List>>,
    cards: HashMap<String, Vec<Card>>,
    labels: HashMap<String, Vec<Label>>,
}

impl<R: Repository> CachedRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            boards: None,
            lists: HashMap::new(),
            cards: HashMap::new(),
            labels: HashMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn has_boards(&self) -> bool {
        self.boards.is_some()
    }

    pub fn has_lists(&self, board_id: &str) -> bool {
        self.lists.contains_key(board_id)
    }

    pub fn has_cards(&self, list_id: &str) -> bool {
        self.cards.contains_key(list_id)
    }

    pub fn invalidate_boards(&mut self) {
        self.boards = None;
    }

    pub fn invalidate_lists(&mut self, board_id: &str) {
        self.lists.remove(board_id);
    }

    pub fn invalidate_cards(&mut self, list_id: &str) {
        self.cards.remove(list_id);
    }

    pub fn clear(&mut self) {
        self.boards = None;
        self.lists.clear();
        self.cards.clear();
        self.labels.clear();
    }

    fn store_card(&mut self, card: &Card) {
        for (list_id, cards) in self.cards.iter_mut() {
            if *list_id != card.list_id {
                cards.retain(|c| c.id != card.id);
            }
        }

        if let Some(cards) = self.cards.get_mut(&card.list_id) {
            if card.closed {
                cards.retain(|c| c.id != card.id);
            } else {
                match cards.iter_mut().find(|c| c.id == card.id) {
                    Some(cached) => *cached = card.clone(),
                    None => cards.push(card.clone()),
                }
                cards.sort_by(|a, b| a.position.total_cmp(&b.position));
            }
        }
    }
}

impl<R: Repository> Repository for CachedRepository<R> {
    fn get_boards(&mut self) -> TrellisResult<Vec<Board>> {
        if let Some(boards) = &self.boards {
            tracing::debug!("cache hit: boards");
            return Ok(boards.clone());
        }
        tracing::debug!("cache miss: boards");
        let boards = self.inner.get_boards()?;
        self.boards = Some(boards.clone());
        Ok(boards)
    }

    fn get_lists(&mut self, board_id: &str) -> TrellisResult<Vec<List>> {
        if let Some(lists) = self.lists.get(board_id) {
            tracing::debug!(board_id, "cache hit: lists");
            return Ok(lists.clone());
        }
        tracing::debug!(board_id, "cache miss: lists");
        let lists = self.inner.get_lists(board_id)?;
        self.lists.insert(board_id.to_string(), lists.clone());
        Ok(lists)
    }

    fn get_cards(&mut self, list_id: &str) -> TrellisResult<Vec<Card>> {
        if let Some(cards) = self.cards.get(list_id) {
            tracing::debug!(list_id, "cache hit: cards");
            return Ok(cards.clone());
        }
        tracing::debug!(list_id, "cache miss: cards");
        let cards = self.inner.get_cards(list_id)?;
        self.cards.insert(list_id.to_string(), cards.clone());
        Ok(cards)
    }

    fn get_comments(&mut self, card_id: &str) -> TrellisResult<Vec<Comment>> {
        self.inner.get_comments(card_id)
    }

    fn find_comment(&mut self, card_id: &str, comment_id: &str) -> TrellisResult<Comment> {
        self.inner.find_comment(card_id, comment_id)
    }

    fn get_labels(&mut self, board_id: &str) -> TrellisResult<Vec<Label>> {
        if let Some(labels) = self.labels.get(board_id) {
            tracing::debug!(board_id, "cache hit: labels");
            return Ok(labels.clone());
        }
        let labels = self.inner.get_labels(board_id)?;
        self.labels.insert(board_id.to_string(), labels.clone());
        Ok(labels)
    }

    fn create_card(&mut self, create: CardCreate) -> TrellisResult<Card> {
        let card = self.inner.create_card(create)?;
        self.store_card(&card);
        Ok(card)
    }

    fn update_card(&mut self, update: CardUpdate) -> TrellisResult<Card> {
        let card = self.inner.update_card(update)?;
        self.store_card(&card);
        Ok(card)
    }

    fn create_comment(&mut self, create: CommentCreate) -> TrellisResult<Comment> {
        self.inner.create_comment(create)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ResolutionChain;
    use crate::memory::InMemoryRepository;
    use crate::session::Session;
    use trellis_core::TrellisError;

    struct Fixture {
        cache: CachedRepository<InMemoryRepository>,
        board: Board,
        todo: List,
        done: List,
        card: Card,
    }

    fn fixture() -> Fixture {
        let mut repo = InMemoryRepository::new();
        let board = repo.add_board("Board A");
        let todo = repo.add_list(&board.id, "Todo");
        let done = repo.add_list(&board.id, "Done");
        let card = repo.add_card(&todo, "Ship it");
        repo.add_card(&done, "Old work");
        Fixture {
            cache: CachedRepository::new(repo),
            board,
            todo,
            done,
            card,
        }
    }

    fn names(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_boards_fetched_once() {
        let mut f = fixture();
        let first = f.cache.get_boards().unwrap();
        let second = f.cache.get_boards().unwrap();
        assert_eq!(first, second);
        assert_eq!(f.cache.inner().calls().count("get_boards"), 1);
    }

    #[test]
    fn test_empty_result_is_a_hit() {
        let mut f = fixture();
        let empty = f.cache.inner_mut().add_list(&f.board.id, "Empty");
        assert!(f.cache.get_cards(&empty.id).unwrap().is_empty());
        assert!(f.cache.get_cards(&empty.id).unwrap().is_empty());
        assert_eq!(f.cache.inner().calls().count_with("get_cards", &empty.id), 1);

        let mut empty_repo = CachedRepository::new(InMemoryRepository::new());
        assert!(empty_repo.get_boards().unwrap().is_empty());
        assert!(empty_repo.has_boards());
        empty_repo.get_boards().unwrap();
        assert_eq!(empty_repo.inner().calls().count("get_boards"), 1);
    }

    #[test]
    fn test_find_scans_cached_collection() {
        let mut f = fixture();
        f.cache.find_list(&f.board.id, "Todo").unwrap();
        f.cache.find_list(&f.board.id, "Done").unwrap();
        let err = f.cache.find_list(&f.board.id, "Nope").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.cache.inner().calls().count("get_lists"), 1);
    }

    #[test]
    fn test_update_patches_in_place() {
        let mut f = fixture();
        f.cache.get_cards(&f.todo.id).unwrap();
        f.cache.get_cards(&f.done.id).unwrap();

        let mut update = CardUpdate::new(f.card.id.clone());
        update.name = Some("Shipped".to_string());
        f.cache.update_card(update).unwrap();

        assert_eq!(names(&f.cache.get_cards(&f.todo.id).unwrap()), vec!["Shipped"]);
        assert_eq!(names(&f.cache.get_cards(&f.done.id).unwrap()), vec!["Old work"]);
        assert_eq!(f.cache.inner().calls().count("get_cards"), 2);
    }

    #[test]
    fn test_move_evicts_old_list_and_inserts_new() {
        let mut f = fixture();
        f.cache.get_cards(&f.todo.id).unwrap();
        f.cache.get_cards(&f.done.id).unwrap();

        let mut update = CardUpdate::new(f.card.id.clone());
        update.list_id = Some(f.done.id.clone());
        let moved = f.cache.update_card(update).unwrap();

        assert!(f.cache.get_cards(&f.todo.id).unwrap().is_empty());
        let done = f.cache.get_cards(&f.done.id).unwrap();
        assert_eq!(names(&done), vec!["Old work", "Ship it"]);
        assert_eq!(done[1], moved);
        assert_eq!(f.cache.inner().calls().count("get_cards"), 2);
    }

    #[test]
    fn test_move_into_uncached_list_fetches_fresh() {
        let mut f = fixture();
        f.cache.get_cards(&f.todo.id).unwrap();

        let mut update = CardUpdate::new(f.card.id.clone());
        update.list_id = Some(f.done.id.clone());
        f.cache.update_card(update).unwrap();

        assert!(!f.cache.has_cards(&f.done.id));
        let done = f.cache.get_cards(&f.done.id).unwrap();
        assert_eq!(done.len(), 2);
        assert!(names(&done).contains(&"Ship it"));
        assert_eq!(f.cache.inner().calls().count_with("get_cards", &f.done.id), 1);
    }

    #[test]
    fn test_archive_removes_from_cached_list() {
        let mut f = fixture();
        f.cache.get_cards(&f.todo.id).unwrap();

        let mut update = CardUpdate::new(f.card.id.clone());
        update.closed = Some(true);
        f.cache.update_card(update).unwrap();

        assert!(f.cache.get_cards(&f.todo.id).unwrap().is_empty());
    }

    #[test]
    fn test_create_appends_to_cached_list() {
        let mut f = fixture();
        f.cache.get_cards(&f.todo.id).unwrap();
        f.cache
            .create_card(CardCreate {
                list_id: f.todo.id.clone(),
                name: "Next".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(
            names(&f.cache.get_cards(&f.todo.id).unwrap()),
            vec!["Ship it", "Next"]
        );
        assert_eq!(f.cache.inner().calls().count("get_cards"), 1);
    }

    #[test]
    fn test_failed_write_leaves_cache_untouched() {
        let mut f = fixture();
        let before = f.cache.get_cards(&f.todo.id).unwrap();
        f.cache.inner_mut().fail_on("update_card");

        let mut update = CardUpdate::new(f.card.id.clone());
        update.name = Some("Renamed".to_string());
        assert!(matches!(
            f.cache.update_card(update),
            Err(TrellisError::RemoteFailure { .. })
        ));
        assert_eq!(f.cache.get_cards(&f.todo.id).unwrap(), before);
    }

    #[test]
    fn test_failed_fetch_is_not_cached() {
        let mut f = fixture();
        f.cache.inner_mut().fail_on("get_boards");
        assert!(f.cache.get_boards().is_err());
        assert!(!f.cache.has_boards());

        f.cache.inner_mut().recover("get_boards");
        assert_eq!(f.cache.get_boards().unwrap().len(), 1);
    }

    #[test]
    fn test_invalidate_refetches() {
        let mut f = fixture();
        f.cache.get_lists(&f.board.id).unwrap();
        f.cache.invalidate_lists(&f.board.id);
        f.cache.get_lists(&f.board.id).unwrap();
        assert_eq!(f.cache.inner().calls().count("get_lists"), 2);

        f.cache.get_boards().unwrap();
        f.cache.clear();
        assert!(!f.cache.has_boards());
        assert!(!f.cache.has_lists(&f.board.id));
    }

    #[test]
    fn test_card_miss_keeps_fetched_parents_cached() {
        let mut f = fixture();
        let result = ResolutionChain::start(&mut f.cache)
            .resolve_path("/Board A/Todo/Missing", &Session::new())
            .find_all()
            .finish();
        assert!(result.error().unwrap().is_not_found());
        assert_eq!(result.resolved.list, Some(f.todo.clone()));

        assert!(f.cache.has_boards());
        assert!(f.cache.has_lists(&f.board.id));
        assert!(f.cache.has_cards(&f.todo.id));
        let fetched = f.cache.inner().calls().calls().len();

        let again = ResolutionChain::start(&mut f.cache)
            .resolve_path("/Board A/Todo/Ship it", &Session::new())
            .find_all()
            .finish();
        assert_eq!(again.resolved.card, Some(f.card.clone()));
        assert_eq!(f.cache.inner().calls().calls().len(), fetched);
    }
}
