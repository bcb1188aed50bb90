use std::path::Path;

use trellis_core::TrellisResult;
use trellis_domain::{
    Board, Card, CardCreate, CardUpdate, Comment, CommentCreate, InMemoryRepository, Label, List,
    Repository,
};

use crate::store::JsonFileStore;

/// A repository backed by a JSON file.
///
/// The whole hierarchy is loaded into memory on open; every successful write
/// saves it back before returning. A write whose save fails is undone.
pub struct JsonFileRepository {
    store: JsonFileStore,
    data: InMemoryRepository,
}

impl JsonFileRepository {
    pub fn open(path: impl AsRef<Path>) -> TrellisResult<Self> {
        let store = JsonFileStore::new(path);
        let snapshot = store.load()?;
        tracing::debug!(
            boards = snapshot.boards.len(),
            cards = snapshot.cards.len(),
            "opened {}",
            store.path().display()
        );
        Ok(Self {
            store,
            data: InMemoryRepository::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn data(&self) -> &InMemoryRepository {
        &self.data
    }

    pub fn save(&self) -> TrellisResult<()> {
        self.store.save(self.data.snapshot())
    }

    fn write<T>(
        &mut self,
        apply: impl FnOnce(&mut InMemoryRepository) -> TrellisResult<T>,
    ) -> TrellisResult<T> {
        let before = self.data.snapshot().clone();
        let written = apply(&mut self.data)?;
        if let Err(e) = self.save() {
            tracing::warn!(error = %e, "save failed, write discarded");
            self.data.restore(before);
            return Err(e);
        }
        Ok(written)
    }
}

impl Repository for JsonFileRepository {
    fn get_boards(&mut self) -> TrellisResult<Vec<Board>> {
        self.data.get_boards()
    }

    fn get_lists(&mut self, board_id: &str) -> TrellisResult<Vec<List>> {
        self.data.get_lists(board_id)
    }

    fn get_cards(&mut self, list_id: &str) -> TrellisResult<Vec<Card>> {
        self.data.get_cards(list_id)
    }

    fn get_comments(&mut self, card_id: &str) -> TrellisResult<Vec<Comment>> {
        self.data.get_comments(card_id)
    }

    fn get_labels(&mut self, board_id: &str) -> TrellisResult<Vec<Label>> {
        self.data.get_labels(board_id)
    }

    fn create_card(&mut self, create: CardCreate) -> TrellisResult<Card> {
        self.write(|data| data.create_card(create))
    }

    fn update_card(&mut self, update: CardUpdate) -> TrellisResult<Card> {
        self.write(|data| data.update_card(update))
    }

    fn create_comment(&mut self, create: CommentCreate) -> TrellisResult<Comment> {
        self.write(|data| data.create_comment(create))
    }
}
