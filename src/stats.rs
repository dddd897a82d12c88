//! Windowed loss counters shared between the probe loop and readers.

use parking_lot::Mutex;
use pingwatch_types::Statistics;

use crate::probe::ProbeOutcome;

/// Copy of the window counters taken under the lock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowSnapshot {
    /// Counters for the current window.
    pub statistics: Statistics,
    /// Number of resets performed so far.
    pub generation: u64,
}

/// Thread-safe loss counters for the current window.
///
/// Every read and write goes through a single mutex, so a reader always sees
/// `received + unreachable == transmitted` and never a half-reset window.
/// The lock is only held for counter arithmetic, never across a probe.
///
/// # Example
///
/// ```
/// use pingwatch::{ProbeOutcome, StatsWindow};
///
/// let window = StatsWindow::new();
/// window.record(&ProbeOutcome::Received);
/// window.record(&ProbeOutcome::Timeout);
///
/// let stats = window.snapshot().statistics;
/// assert_eq!(stats.transmitted, 2);
/// assert_eq!(stats.loss_percent, Some(50.0));
/// ```
#[derive(Debug, Default)]
pub struct StatsWindow {
    inner: Mutex<WindowSnapshot>,
}

impl StatsWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one probe outcome.
    ///
    /// Returns `false` without touching the counters for
    /// [`ProbeOutcome::Error`], which is not a loss sample.
    pub fn record(&self, outcome: &ProbeOutcome) -> bool {
        if !outcome.is_sample() {
            return false;
        }
        let lost = u64::from(outcome.is_loss());

        let mut inner = self.inner.lock();
        let current = inner.statistics;
        inner.statistics = Statistics::from_counts(
            current.received + (1 - lost),
            current.unreachable + lost,
        );
        true
    }

    /// Zero all counters and start a new window generation.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.statistics = Statistics::default();
        inner.generation += 1;
    }

    /// Copy the current counters.
    pub fn snapshot(&self) -> WindowSnapshot {
        *self.inner.lock()
    }
}
