use serde::{Deserialize, Serialize};
use trellis_core::{Resource, ResourceKind};

use crate::board::BoardId;
use crate::identity;

pub type LabelId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub board_id: BoardId,
    pub name: String,
    pub color: String,
}

impl Label {
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: identity::new_id(),
            board_id: board_id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

impl Resource for Label {
    const KIND: ResourceKind = ResourceKind::Label;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
