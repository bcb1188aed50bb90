use serde::{Deserialize, Serialize};
use trellis_core::{Resource, ResourceKind};

use crate::board::BoardId;
use crate::field_update::FieldUpdate;
use crate::identity;
use crate::label::{Label, LabelId};
use crate::list::ListId;

pub type CardId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub board_id: BoardId,
    pub list_id: ListId,
    #[serde(default)]
    pub closed: bool,
    pub short_link: String,
    pub short_url: String,
    pub position: f64,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Fields for creating a card in a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardCreate {
    pub list_id: ListId,
    pub name: String,
    pub description: Option<String>,
    /// Appended after the last card when absent.
    pub position: Option<f64>,
    pub label_ids: Vec<LabelId>,
}

/// Partial update of a card. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub card_id: CardId,
    /// Target list; moves the card when it differs from the current one.
    pub list_id: Option<ListId>,
    pub name: Option<String>,
    pub description: FieldUpdate<String>,
    pub position: Option<f64>,
    pub closed: Option<bool>,
    pub label_ids: Option<Vec<LabelId>>,
}

impl CardUpdate {
    pub fn new(card_id: impl Into<CardId>) -> Self {
        Self {
            card_id: card_id.into(),
            ..Default::default()
        }
    }

    pub fn is_move(&self, card: &Card) -> bool {
        self.list_id.as_ref().is_some_and(|list| *list != card.list_id)
    }

    pub fn is_empty(&self) -> bool {
        self.list_id.is_none()
            && self.name.is_none()
            && !self.description.is_change()
            && self.position.is_none()
            && self.closed.is_none()
            && self.label_ids.is_none()
    }
}

impl Card {
    pub fn new(
        board_id: impl Into<BoardId>,
        list_id: impl Into<ListId>,
        name: impl Into<String>,
        position: f64,
    ) -> Self {
        let id = identity::new_id();
        let short_link = identity::short_link_for(&id);
        Self {
            short_url: identity::card_url(&short_link),
            id,
            name: name.into(),
            description: None,
            board_id: board_id.into(),
            list_id: list_id.into(),
            closed: false,
            short_link,
            position,
            labels: Vec::new(),
        }
    }

    /// Applies `update`, resolving label IDs against `board_labels`.
    /// Unknown label IDs are ignored.
    pub fn apply(&mut self, update: CardUpdate, board_labels: &[Label]) {
        if let Some(list_id) = update.list_id {
            self.list_id = list_id;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        update.description.apply_to(&mut self.description);
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(closed) = update.closed {
            self.closed = closed;
        }
        if let Some(label_ids) = update.label_ids {
            self.set_labels(&label_ids, board_labels);
        }
    }

    pub fn set_labels(&mut self, label_ids: &[LabelId], board_labels: &[Label]) {
        let mut labels: Vec<Label> = Vec::with_capacity(label_ids.len());
        for id in label_ids {
            if labels.iter().any(|l| &l.id == id) {
                continue;
            }
            if let Some(label) = board_labels.iter().find(|l| &l.id == id) {
                labels.push(label.clone());
            }
        }
        self.labels = labels;
    }

    pub fn label_ids(&self) -> Vec<LabelId> {
        self.labels.iter().map(|l| l.id.clone()).collect()
    }
}

impl Resource for Card {
    const KIND: ResourceKind = ResourceKind::Card;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn short_link(&self) -> Option<&str> {
        Some(&self.short_link)
    }
}
