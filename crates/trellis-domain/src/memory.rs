//! An in-process [`Repository`] holding the whole hierarchy in memory.
//!
//! Used as the backing store of the file repository and as a fake remote in
//! tests: every call is recorded in a [`CallLog`], and individual methods can
//! be made to fail with `RemoteFailure`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use trellis_core::{ResourceKind, TrellisError, TrellisResult};

use crate::operations::Repository;
use crate::{Board, Card, CardCreate, CardUpdate, Comment, CommentCreate, Label, List};

const DEFAULT_AUTHOR: &str = "me";

/// Everything an in-memory repository holds, in serialisable form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub argument: String,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Vec<Call>,
}

impl CallLog {
    fn record(&mut self, method: &'static str, argument: impl Into<String>) {
        self.calls.push(Call {
            method,
            argument: argument.into(),
        });
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.iter().filter(|c| c.method == method).count()
    }

    pub fn count_with(&self, method: &str, argument: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| c.method == method && c.argument == argument)
            .count()
    }

    /// Distinct arguments a method was called with, in first-call order.
    pub fn arguments(&self, method: &str) -> Vec<&str> {
        let mut seen = Vec::new();
        for call in self.calls.iter().filter(|c| c.method == method) {
            if !seen.contains(&call.argument.as_str()) {
                seen.push(call.argument.as_str());
            }
        }
        seen
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    data: RepositorySnapshot,
    calls: CallLog,
    failing: HashSet<&'static str>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::from_snapshot(RepositorySnapshot::default())
    }

    pub fn from_snapshot(data: RepositorySnapshot) -> Self {
        Self {
            data,
            calls: CallLog::default(),
            failing: HashSet::new(),
        }
    }

    pub fn snapshot(&self) -> &RepositorySnapshot {
        &self.data
    }

    /// Puts back an earlier snapshot. The call log is kept.
    pub fn restore(&mut self, data: RepositorySnapshot) {
        self.data = data;
    }

    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Makes every later call to `method` fail with `RemoteFailure`.
    pub fn fail_on(&mut self, method: &'static str) {
        self.failing.insert(method);
    }

    pub fn recover(&mut self, method: &'static str) {
        self.failing.remove(method);
    }

    pub fn add_board(&mut self, name: &str) -> Board {
        let board = Board::new(name);
        self.data.boards.push(board.clone());
        board
    }

    pub fn add_list(&mut self, board_id: &str, name: &str) -> List {
        let list = List::new(board_id, name);
        self.data.lists.push(list.clone());
        list
    }

    /// Adds an open card at the bottom of `list`.
    pub fn add_card(&mut self, list: &List, name: &str) -> Card {
        let position = self.next_position(&list.id);
        let card = Card::new(list.board_id.clone(), list.id.clone(), name, position);
        self.data.cards.push(card.clone());
        card
    }

    pub fn add_label(&mut self, board_id: &str, name: &str, color: &str) -> Label {
        let label = Label::new(board_id, name, color);
        self.data.labels.push(label.clone());
        label
    }

    pub fn add_comment(&mut self, card_id: &str, text: &str) -> Comment {
        let comment = Comment::new(card_id, DEFAULT_AUTHOR, text);
        self.data.comments.push(comment.clone());
        comment
    }

    fn enter(&mut self, method: &'static str, argument: &str) -> TrellisResult<()> {
        self.calls.record(method, argument);
        if self.failing.contains(method) {
            return Err(TrellisError::RemoteFailure {
                message: format!("{} failed", method),
                source: None,
            });
        }
        Ok(())
    }

    fn next_position(&self, list_id: &str) -> f64 {
        self.data
            .cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .map(|c| c.position)
            .fold(0.0, f64::max)
            + 1.0
    }

    fn list_by_id(&self, list_id: &str) -> TrellisResult<&List> {
        self.data
            .lists
            .iter()
            .find(|l| l.id == list_id)
            .ok_or_else(|| TrellisError::not_found(ResourceKind::List, list_id))
    }

    fn board_labels(&self, board_id: &str) -> Vec<Label> {
        self.data
            .labels
            .iter()
            .filter(|l| l.board_id == board_id)
            .cloned()
            .collect()
    }

    fn touch_board(&mut self, board_id: &str) {
        if let Some(board) = self.data.boards.iter_mut().find(|b| b.id == board_id) {
            board.touch();
        }
    }
}

impl Repository for InMemoryRepository {
    fn get_boards(&mut self) -> TrellisResult<Vec<Board>> {
        self.enter("get_boards", "")?;
        Ok(self.data.boards.clone())
    }

    fn get_lists(&mut self, board_id: &str) -> TrellisResult<Vec<List>> {
        self.enter("get_lists", board_id)?;
        if !self.data.boards.iter().any(|b| b.id == board_id) {
            return Err(TrellisError::not_found(ResourceKind::Board, board_id));
        }
        Ok(self
            .data
            .lists
            .iter()
            .filter(|l| l.board_id == board_id)
            .cloned()
            .collect())
    }

    fn get_cards(&mut self, list_id: &str) -> TrellisResult<Vec<Card>> {
        self.enter("get_cards", list_id)?;
        self.list_by_id(list_id)?;
        let mut cards: Vec<Card> = self
            .data
            .cards
            .iter()
            .filter(|c| c.list_id == list_id && !c.closed)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(cards)
    }

    fn get_comments(&mut self, card_id: &str) -> TrellisResult<Vec<Comment>> {
        self.enter("get_comments", card_id)?;
        if !self.data.cards.iter().any(|c| c.id == card_id) {
            return Err(TrellisError::not_found(ResourceKind::Card, card_id));
        }
        Ok(self
            .data
            .comments
            .iter()
            .filter(|c| c.card_id == card_id)
            .cloned()
            .collect())
    }

    fn get_labels(&mut self, board_id: &str) -> TrellisResult<Vec<Label>> {
        self.enter("get_labels", board_id)?;
        Ok(self.board_labels(board_id))
    }

    fn create_card(&mut self, create: CardCreate) -> TrellisResult<Card> {
        self.enter("create_card", &create.list_id)?;
        let board_id = self.list_by_id(&create.list_id)?.board_id.clone();
        let position = create
            .position
            .unwrap_or_else(|| self.next_position(&create.list_id));

        let mut card = Card::new(board_id.clone(), create.list_id, create.name, position);
        card.description = create.description.filter(|d| !d.is_empty());
        card.set_labels(&create.label_ids, &self.board_labels(&board_id));

        self.data.cards.push(card.clone());
        self.touch_board(&board_id);
        Ok(card)
    }

    fn update_card(&mut self, update: CardUpdate) -> TrellisResult<Card> {
        self.enter("update_card", &update.card_id)?;
        let target_board = match &update.list_id {
            Some(list_id) => Some(self.list_by_id(list_id)?.board_id.clone()),
            None => None,
        };
        let index = self
            .data
            .cards
            .iter()
            .position(|c| c.id == update.card_id)
            .ok_or_else(|| TrellisError::not_found(ResourceKind::Card, &update.card_id))?;

        let board_id = target_board.unwrap_or_else(|| self.data.cards[index].board_id.clone());
        let labels = self.board_labels(&board_id);

        let card = &mut self.data.cards[index];
        if card.board_id != board_id {
            card.board_id = board_id.clone();
            let kept = card.label_ids();
            card.set_labels(&kept, &labels);
        }
        card.apply(update, &labels);
        let updated = card.clone();

        self.touch_board(&board_id);
        Ok(updated)
    }

    fn create_comment(&mut self, create: CommentCreate) -> TrellisResult<Comment> {
        self.enter("create_comment", &create.card_id)?;
        if !self.data.cards.iter().any(|c| c.id == create.card_id) {
            return Err(TrellisError::not_found(ResourceKind::Card, &create.card_id));
        }
        Ok(self.add_comment(&create.card_id, &create.text))
    }
}
