//! Helpers for minting the remote-style identities used by local repositories.
//!
//! Real remote IDs are opaque strings; locally we use simple-form UUIDs and
//! derive the short link from their leading characters.

use uuid::Uuid;

const SHORT_LINK_LEN: usize = 8;
const SHORT_URL_BASE: &str = "https://trellis.local";

pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn short_link_for(id: &str) -> String {
    id.chars().take(SHORT_LINK_LEN).collect()
}

pub fn board_url(short_link: &str) -> String {
    format!("{}/b/{}", SHORT_URL_BASE, short_link)
}

pub fn card_url(short_link: &str) -> String {
    format!("{}/c/{}", SHORT_URL_BASE, short_link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link_is_id_prefix() {
        let id = new_id();
        let link = short_link_for(&id);
        assert_eq!(link.len(), 8);
        assert!(id.starts_with(&link));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn test_urls() {
        assert_eq!(board_url("abc"), "https://trellis.local/b/abc");
        assert_eq!(card_url("abc"), "https://trellis.local/c/abc");
    }
}
