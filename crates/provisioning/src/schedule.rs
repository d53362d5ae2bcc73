//! Timing parameters of the poll loop.

use std::time::Duration;

/// How often and for how long the supervisor polls a build.
///
/// All three values are compared against deadlines derived from the trigger
/// instant and the host's remaining time, so they never accumulate drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    interval: Duration,
    max_wait: Duration,
    safety_margin: Duration,
}

impl PollSchedule {
    /// Default delay between status queries.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
    /// Default ceiling on the whole poll loop.
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(900);
    /// Default execution time kept in reserve for the final callback.
    pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_secs(60);

    /// Creates a schedule, returning `None` if `interval` is zero.
    #[must_use]
    pub fn new(interval: Duration, max_wait: Duration, safety_margin: Duration) -> Option<Self> {
        if interval.is_zero() {
            None
        } else {
            Some(Self {
                interval,
                max_wait,
                safety_margin,
            })
        }
    }

    /// Delay between the start of consecutive status queries.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Maximum time spent polling after the build is triggered.
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Polling stops once the host's remaining time drops below this.
    pub fn safety_margin(&self) -> Duration {
        self.safety_margin
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_wait: Self::DEFAULT_MAX_WAIT,
            safety_margin: Self::DEFAULT_SAFETY_MARGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_is_rejected() {
        assert!(PollSchedule::new(Duration::ZERO, Duration::from_secs(900), Duration::ZERO).is_none());
    }

    #[test]
    fn defaults() {
        let schedule = PollSchedule::default();
        assert_eq!(schedule.interval(), Duration::from_secs(30));
        assert_eq!(schedule.max_wait(), Duration::from_secs(900));
        assert_eq!(schedule.safety_margin(), Duration::from_secs(60));
    }
}
