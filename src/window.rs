//! Window timing, independent of probe outcomes.

use std::time::Duration;

use tokio::time::Instant;

/// Tracks when the current statistics window started and when it is due to
/// be reset.
///
/// Pure bookkeeping: the caller supplies `now`, which keeps the clock
/// deterministic in tests and lets it follow tokio's paused test clock.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pingwatch::WindowClock;
/// use tokio::time::Instant;
///
/// let start = Instant::now();
/// let mut clock = WindowClock::new(Duration::from_secs(60), start);
///
/// assert!(!clock.due_for_reset(start + Duration::from_secs(59)));
/// assert!(clock.due_for_reset(start + Duration::from_secs(60)));
///
/// clock.mark_reset(start + Duration::from_secs(60));
/// assert!(!clock.due_for_reset(start + Duration::from_secs(61)));
/// ```
#[derive(Debug, Clone)]
pub struct WindowClock {
    window_duration: Duration,
    window_start: Instant,
}

impl WindowClock {
    /// Start the first window at `now`.
    pub fn new(window_duration: Duration, now: Instant) -> Self {
        Self {
            window_duration,
            window_start: now,
        }
    }

    /// Whether the current window has run its full length at `now`.
    ///
    /// Stays true until [`mark_reset`](Self::mark_reset) is called, however
    /// many windows have elapsed in the meantime.
    pub fn due_for_reset(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.window_duration
    }

    /// Start a new window at `now`.
    pub fn mark_reset(&mut self, now: Instant) {
        self.window_start = now;
    }

    /// Time since the current window started, zero if `now` is earlier.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.window_start)
    }

    /// Configured length of each window.
    pub fn window_duration(&self) -> Duration {
        self.window_duration
    }
}
