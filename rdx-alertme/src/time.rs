//! Time primitives: the restartable cycle timer and duration presentation.
//!
//! All measurements use `tokio::time::Instant`, which is monotonic and can be
//! paused and advanced in tests.

use crate::config::Interval;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, Sleep};

/// How often an active session republishes its elapsed time.
pub const DISPLAY_REFRESH: Duration = Duration::from_secs(1);

/// A single-shot clock that fires once, `Interval` after it was armed.
///
/// A `CycleTimer` is never reset. Starting a new cycle means arming a fresh one
/// and dropping the old.
#[derive(Debug)]
pub struct CycleTimer {
    armed_at: Instant,
    deadline: Instant,
    sleep: Pin<Box<Sleep>>,
}

impl CycleTimer {
    /// Arms a new timer that fires `interval` from now.
    pub fn arm(interval: Interval) -> Self {
        let armed_at = Instant::now();
        let deadline = armed_at + interval.as_duration();
        Self {
            armed_at,
            deadline,
            sleep: Box::pin(tokio::time::sleep_until(deadline)),
        }
    }

    pub fn armed_at(&self) -> Instant {
        self.armed_at
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the timer fires, zero once the deadline has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Completes when the deadline is reached. Cancel-safe.
    pub async fn fired(&mut self) {
        self.sleep.as_mut().await
    }
}

/// Rounds a duration to the nearest whole second, halves rounding up.
pub fn round_to_seconds(duration: Duration) -> Duration {
    let carry = u64::from(duration.subsec_nanos() >= 500_000_000);
    Duration::from_secs(duration.as_secs() + carry)
}

/// Renders a duration in compact `1h2m3s` form after rounding to whole seconds.
///
/// Leading zero units are omitted, inner ones are kept: `0s`, `45s`, `1m0s`,
/// `1h0m5s`.
pub fn format_duration(duration: Duration) -> String {
    let total = round_to_seconds(duration).as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_to_seconds(Duration::from_millis(1499)), Duration::from_secs(1));
        assert_eq!(round_to_seconds(Duration::from_millis(1500)), Duration::from_secs(2));
        assert_eq!(round_to_seconds(Duration::from_millis(400)), Duration::ZERO);
    }

    #[test]
    fn formats_like_a_clock() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_secs(12)), "12s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m0s");
        assert_eq!(format_duration(Duration::from_secs(3605)), "1h0m5s");
        assert_eq!(format_duration(Duration::from_millis(59_600)), "1m0s");
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_timer_fires_after_interval() {
        let interval = Interval::new(Duration::from_secs(30)).unwrap();
        let mut timer = CycleTimer::arm(interval);
        assert_eq!(timer.deadline() - timer.armed_at(), Duration::from_secs(30));
        assert_eq!(timer.remaining(), Duration::from_secs(30));

        let start = Instant::now();
        timer.fired().await;
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_timer_arms_with_the_longest_interval() {
        let interval = Interval::from_minutes(crate::config::MAX_INTERVAL_MINUTES).unwrap();
        let timer = CycleTimer::arm(interval);
        assert_eq!(timer.remaining(), interval.as_duration());
    }
}
