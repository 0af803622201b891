use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;

use crate::config::FEED;
use crate::news::snapshot::FeedSnapshot;
use crate::utils::app_time::AppInstant;

/// How old a cached snapshot may get before a poll goes back to the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreshnessPolicy {
    pub max_age: Duration,
}

impl FreshnessPolicy {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn is_fresh(&self, age: Duration) -> bool {
        age < self.max_age
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(FEED.freshness_max_age)
    }
}

#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub snapshot: Arc<FeedSnapshot>,
    /// Monotonic; drives the freshness check
    pub fetched_at: AppInstant,
    /// Display only
    pub fetched_at_wall: DateTime<Local>,
}

impl CachedSnapshot {
    pub fn age(&self, now: AppInstant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }
}

/// Last successful snapshot, owned by the poller.
#[derive(Debug, Default)]
pub struct FeedCache {
    entry: Option<CachedSnapshot>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(
        &mut self,
        snapshot: FeedSnapshot,
        fetched_at: AppInstant,
        fetched_at_wall: DateTime<Local>,
    ) -> &CachedSnapshot {
        self.entry.insert(CachedSnapshot {
            snapshot: Arc::new(snapshot),
            fetched_at,
            fetched_at_wall,
        })
    }

    /// The cached entry, only if the policy still considers it fresh at `now`.
    pub fn fresh(&self, policy: &FreshnessPolicy, now: AppInstant) -> Option<&CachedSnapshot> {
        self.entry
            .as_ref()
            .filter(|entry| policy.is_fresh(entry.age(now)))
    }

    /// The cached entry regardless of age (error fallback).
    pub fn latest(&self) -> Option<&CachedSnapshot> {
        self.entry.as_ref()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::app_time::{now, wall_clock_now};

    fn snapshot() -> FeedSnapshot {
        FeedSnapshot {
            category: "General News".to_string(),
            feed_name: "BBC".to_string(),
            items: Vec::new(),
        }
    }

    #[test]
    fn fresh_within_max_age_stale_after() {
        let policy = FreshnessPolicy::new(Duration::from_secs(60));
        let t0 = now();
        let mut cache = FeedCache::new();
        cache.store(snapshot(), t0, wall_clock_now());

        assert!(cache.fresh(&policy, t0 + Duration::from_secs(59)).is_some());
        assert!(cache.fresh(&policy, t0 + Duration::from_secs(60)).is_none());
        // Stale entries are still available as a fallback
        assert!(cache.latest().is_some());
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = FeedCache::new();
        cache.store(snapshot(), now(), wall_clock_now());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.latest().is_none());
    }
}
