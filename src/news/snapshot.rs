use serde::{Deserialize, Serialize};

use crate::config::FEED;
use crate::news::source::FeedError;

/// One headline as served by `GET /news`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    #[serde(default = "default_link")]
    pub link: String,
    #[serde(default)]
    pub preview: String,
}

/// The whole `/news` payload. Replaced wholesale on every successful poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub category: String,
    pub feed_name: String,
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

fn default_link() -> String {
    "#".to_string()
}

impl FeedSnapshot {
    pub fn from_json(body: &str) -> Result<Self, FeedError> {
        serde_json::from_str(body).map_err(|e| FeedError::Decode(e.to_string()))
    }

    /// Header line: "<category> → <feed_name>"
    pub fn header(&self) -> String {
        format!(
            "{}{}{}",
            self.category, FEED.header_separator, self.feed_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let body = r#"{
            "category": "Tech & Music",
            "feed_name": "Hacker News",
            "items": [
                {"title": "Rust 2.0", "link": "https://example.com/a", "preview": "Nope."}
            ]
        }"#;

        let snapshot = FeedSnapshot::from_json(body).unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].link, "https://example.com/a");
        assert_eq!(snapshot.header(), "Tech & Music → Hacker News");
    }

    #[test]
    fn missing_link_and_preview_get_defaults() {
        let body = r#"{"category":"C","feed_name":"F","items":[{"title":"T"}]}"#;
        let snapshot = FeedSnapshot::from_json(body).unwrap();
        assert_eq!(snapshot.items[0].link, "#");
        assert_eq!(snapshot.items[0].preview, "");
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = FeedSnapshot::from_json("<html>502</html>").unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }
}
