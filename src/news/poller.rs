use std::time::Duration;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::news::cache::{FeedCache, FreshnessPolicy};
use crate::news::schedule::RecurringTask;
use crate::news::snapshot::FeedSnapshot;
use crate::news::source::{FeedError, FeedSource, FetchPromise};
use crate::news::view::FeedView;
use crate::utils::app_time::{AppInstant, wall_clock_now};

/// What a single poll invocation decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The cached snapshot was young enough; no network call
    CacheHit,
    /// A network fetch was started
    FetchStarted,
    /// A fetch is already in flight; this tick is skipped
    AlreadyFetching,
    /// The poller has been stopped
    Stopped,
}

struct InFlight {
    promise: FetchPromise,
    started_at: AppInstant,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PollStats {
    pub fetches_started: u64,
    pub cache_hits: u64,
    pub failures: u64,
}

/// Owns the feed cache and the rendered view; drives both from the frame loop.
pub struct NewsPoller {
    source: Box<dyn FeedSource>,
    policy: FreshnessPolicy,
    cache: FeedCache,
    schedule: RecurringTask,
    view: FeedView,
    in_flight: Option<InFlight>,
    last_error: Option<FeedError>,
    stats: PollStats,
}

impl NewsPoller {
    pub fn new(source: Box<dyn FeedSource>, policy: FreshnessPolicy, interval: Duration) -> Self {
        log::info!(
            "News poller: polling {} every {}s (cache {}s)",
            source.describe(),
            interval.as_secs(),
            policy.max_age.as_secs()
        );

        Self {
            source,
            policy,
            cache: FeedCache::new(),
            schedule: RecurringTask::new(interval),
            view: FeedView::new(),
            in_flight: None,
            last_error: None,
            stats: PollStats::default(),
        }
    }

    /// Call once per frame. Collects a finished fetch and runs the schedule.
    pub fn tick(&mut self, now: AppInstant) -> Option<PollOutcome> {
        self.check_in_flight(now);

        if !self.schedule.poll_due(now) {
            return None;
        }

        let outcome = self.poll(now);

        // Sources that answer synchronously land in the same frame
        self.check_in_flight(now);

        Some(outcome)
    }

    /// One "load news" invocation: serve from cache if fresh, else fetch.
    pub fn poll(&mut self, now: AppInstant) -> PollOutcome {
        if self.schedule.is_cancelled() {
            return PollOutcome::Stopped;
        }

        if let Some(cached) = self.cache.fresh(&self.policy, now) {
            self.view
                .render_snapshot(&cached.snapshot, cached.fetched_at_wall);
            self.stats.cache_hits += 1;

            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_poll_ticks {
                log::info!(
                    "News poll: cache hit ({}s old)",
                    cached.age(now).as_secs()
                );
            }
            return PollOutcome::CacheHit;
        }

        if self.in_flight.is_some() {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_poll_ticks {
                log::info!("News poll: previous fetch still running, skipping tick");
            }
            return PollOutcome::AlreadyFetching;
        }

        self.start_fetch(now);
        PollOutcome::FetchStarted
    }

    /// Manual refresh: drop the cache and any in-flight fetch, fetch now.
    pub fn refresh_now(&mut self, now: AppInstant) -> PollOutcome {
        if self.schedule.is_cancelled() {
            return PollOutcome::Stopped;
        }

        self.cache.clear();
        if self.in_flight.take().is_some() {
            log::info!("News refresh: superseding the fetch already in flight");
        }

        self.start_fetch(now);
        self.check_in_flight(now);
        PollOutcome::FetchStarted
    }

    /// Stops the schedule and abandons any fetch in flight. The view keeps
    /// whatever it shows.
    pub fn stop(&mut self) {
        self.schedule.cancel();
        self.in_flight = None;
    }

    fn start_fetch(&mut self, now: AppInstant) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_poll_ticks {
            log::info!("News poll: fetching {}", self.source.describe());
        }

        self.stats.fetches_started += 1;
        self.in_flight = Some(InFlight {
            promise: self.source.request(),
            started_at: now,
        });
    }

    /// Applies the in-flight result if it has arrived. Returns true if it did.
    pub fn check_in_flight(&mut self, now: AppInstant) -> bool {
        let Some(in_flight) = self.in_flight.take() else {
            return false;
        };

        match in_flight.promise.try_take() {
            Ok(result) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_fetch_results {
                    log::info!(
                        "News fetch finished in {}ms",
                        now.saturating_duration_since(in_flight.started_at).as_millis()
                    );
                }
                self.apply_result(result, now);
                true
            }
            Err(promise) => {
                self.in_flight = Some(InFlight {
                    promise,
                    started_at: in_flight.started_at,
                });
                false
            }
        }
    }

    fn apply_result(&mut self, result: Result<FeedSnapshot, FeedError>, now: AppInstant) {
        match result {
            Ok(snapshot) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_fetch_results {
                    log::info!(
                        "News fetch: {} item(s) from {} → {}",
                        snapshot.items.len(),
                        snapshot.category,
                        snapshot.feed_name
                    );
                }

                let cached = self.cache.store(snapshot, now, wall_clock_now());
                self.view
                    .render_snapshot(&cached.snapshot, cached.fetched_at_wall);
                self.view.hide_error();
                self.last_error = None;
            }
            Err(error) => {
                log::error!("❌ News fetch failed: {}", error);
                self.stats.failures += 1;
                self.view.show_error();

                // Keep known data on screen rather than a bare "Loading…"
                if let Some(cached) = self.cache.latest() {
                    self.view
                        .render_snapshot(&cached.snapshot, cached.fetched_at_wall);
                }
                self.last_error = Some(error);
            }
        }
    }

    pub fn view(&self) -> &FeedView {
        &self.view
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&FeedError> {
        self.last_error.as_ref()
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    pub fn is_stopped(&self) -> bool {
        self.schedule.is_cancelled()
    }

    /// For `request_repaint_after`: how long the UI may sleep.
    pub fn time_until_next_poll(&self, now: AppInstant) -> Option<Duration> {
        self.schedule.time_until_due(now)
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}
