use std::time::Duration;

use crate::utils::app_time::AppInstant;

/// A fixed-interval timer driven by the UI frame loop.
///
/// Due immediately on creation, then once per `interval`. Missed intervals
/// (a backgrounded tab, a stalled frame) collapse into a single run.
#[derive(Debug, Clone)]
pub struct RecurringTask {
    interval: Duration,
    next_due: Option<AppInstant>,
    cancelled: bool,
    runs: u64,
}

impl RecurringTask {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            cancelled: false,
            runs: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when the task should run at `now`, and arms the next run.
    pub fn poll_due(&mut self, now: AppInstant) -> bool {
        if self.cancelled {
            return false;
        }

        let due = match self.next_due {
            None => true,
            Some(next) => now >= next,
        };

        if due {
            self.next_due = Some(now + self.interval);
            self.runs += 1;
        }
        due
    }

    /// None once cancelled.
    pub fn time_until_due(&self, now: AppInstant) -> Option<Duration> {
        if self.cancelled {
            return None;
        }
        Some(
            self.next_due
                .map(|next| next.saturating_duration_since(now))
                .unwrap_or_default(),
        )
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.next_due = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::app_time::now;

    #[test]
    fn fires_immediately_then_every_interval() {
        let t0 = now();
        let mut task = RecurringTask::new(Duration::from_secs(10));

        assert!(task.poll_due(t0));
        assert!(!task.poll_due(t0 + Duration::from_secs(9)));
        assert!(task.poll_due(t0 + Duration::from_secs(10)));
        assert_eq!(task.runs(), 2);
    }

    #[test]
    fn missed_intervals_collapse_into_one_run() {
        let t0 = now();
        let mut task = RecurringTask::new(Duration::from_secs(10));
        task.poll_due(t0);

        let late = t0 + Duration::from_secs(45);
        assert!(task.poll_due(late));
        assert!(!task.poll_due(late + Duration::from_secs(1)));
        assert_eq!(
            task.time_until_due(late),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn never_fires_after_cancel() {
        let t0 = now();
        let mut task = RecurringTask::new(Duration::from_secs(10));
        task.poll_due(t0);
        task.cancel();

        assert!(!task.poll_due(t0 + Duration::from_secs(100)));
        assert!(task.is_cancelled());
        assert_eq!(task.time_until_due(t0), None);
    }
}
