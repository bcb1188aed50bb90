use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trellis_core::{Resource, ResourceKind};

use crate::card::CardId;
use crate::identity;

pub type CommentId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub card_id: CardId,
    pub date: DateTime<Utc>,
    pub author_username: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentCreate {
    pub card_id: CardId,
    pub text: String,
}

impl Comment {
    pub fn new(card_id: impl Into<CardId>, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: identity::new_id(),
            card_id: card_id.into(),
            date: Utc::now(),
            author_username: author.into(),
            text: text.into(),
        }
    }
}

/// Comments are addressed by ID only.
impl Resource for Comment {
    const KIND: ResourceKind = ResourceKind::Comment;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }
}
