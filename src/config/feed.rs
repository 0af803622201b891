//! News feed endpoint and polling configuration.

use std::time::Duration;

/// The Master Feed Configuration
pub struct FeedConfig {
    /// Endpoint used by the native build when no `--feed-url` is given
    pub default_url: &'static str,
    /// Path appended to the page origin in the browser build
    pub web_path: &'static str,
    /// Time between scheduled polls
    pub poll_interval: Duration,
    /// A cached snapshot younger than this is reused instead of fetched
    pub freshness_max_age: Duration,
    /// Header text shown until the first snapshot arrives
    pub loading_header: &'static str,
    /// Fixed message shown when a fetch fails
    pub error_message: &'static str,
    /// Separator between category and feed name in the header
    pub header_separator: &'static str,
}

pub const FEED: FeedConfig = FeedConfig {
    default_url: "http://127.0.0.1:5000/news",
    web_path: "/news",
    poll_interval: Duration::from_secs(10),
    freshness_max_age: Duration::from_secs(60),
    loading_header: "Loading…",
    error_message: "Could not load the news feed.",
    header_separator: " → ",
};
