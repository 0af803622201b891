//! News poller: fetches the feed snapshot on a timer, caches it and keeps a
//! retained list view that the UI draws every frame.

pub mod cache;
pub mod poller;
pub mod schedule;
pub mod snapshot;
pub mod source;
pub mod view;

pub use cache::{CachedSnapshot, FeedCache, FreshnessPolicy};
pub use poller::{NewsPoller, PollOutcome};
pub use schedule::RecurringTask;
pub use snapshot::{FeedItem, FeedSnapshot};
pub use source::{FeedError, FeedSource, FetchPromise, HttpFeedSource};
pub use view::{ElementId, FeedView, ListEntry, TooltipRegistry};
