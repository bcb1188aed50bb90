use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trellis_core::{Resource, ResourceKind};

use crate::identity;

pub type BoardId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub short_link: String,
    pub short_url: String,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        let id = identity::new_id();
        let short_link = identity::short_link_for(&id);
        Self {
            short_url: identity::board_url(&short_link),
            id,
            name: name.into(),
            short_link,
            last_activity: Some(Utc::now()),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Some(Utc::now());
    }
}

impl Resource for Board {
    const KIND: ResourceKind = ResourceKind::Board;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_includes_short_link() {
        let board = Board::new("Roadmap");
        assert_eq!(
            board.identifier(),
            format!("Roadmap[{}]", board.short_link)
        );
        assert!(board.short_url.ends_with(&board.short_link));
    }

    #[test]
    fn test_touch_updates_activity() {
        let mut board = Board::new("Roadmap");
        board.last_activity = None;
        board.touch();
        assert!(board.last_activity.is_some());
    }
}
