/// Every user-facing string in one place
pub struct UiText {
    pub window_title: &'static str,
    pub news_heading: &'static str,
    pub refresh_button: &'static str,
    pub refresh_tooltip: &'static str,
    pub background_toggle: &'static str,
    pub updated_prefix: &'static str,
    pub next_poll_prefix: &'static str,
    pub fetching: &'static str,
    pub polling_stopped: &'static str,
    pub empty_feed: &'static str,
    pub source_label: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    window_title: "Feed Glow",
    news_heading: "News",
    refresh_button: "⟳ Refresh",
    refresh_tooltip: "Fetch the feed now, ignoring the cache",
    background_toggle: "Background",
    updated_prefix: "Updated ",
    next_poll_prefix: "Next poll in ",
    fetching: "Fetching…",
    polling_stopped: "Polling stopped",
    empty_feed: "No stories right now",
    source_label: "Source",
};
