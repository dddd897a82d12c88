//! Snapshot - a point-in-time view of a monitor.

use crate::{Microseconds, Severity, Statistics};

/// A point-in-time copy of a monitor's window statistics.
///
/// Snapshots are created fresh on every read and share nothing with the live
/// monitor, so a renderer can hold on to one for as long as it likes.
///
/// # Example
///
/// ```rust
/// use pingwatch_types::{Snapshot, Statistics};
///
/// let snapshot = Snapshot::builder()
///     .target("1.1.1.1")
///     .statistics(Statistics::from_counts(10, 0))
///     .build();
///
/// assert_eq!(snapshot.statistics.loss_percent, Some(0.0));
/// assert!(snapshot.severity.is_unknown());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Host or address being probed.
    pub target: String,

    /// Unix timestamp in milliseconds when this snapshot was taken.
    pub timestamp_ms: u64,

    /// Counters for the current window.
    pub statistics: Statistics,

    /// Bucket the loss percentage falls into.
    pub severity: Severity,

    /// Number of window resets since the monitor was created.
    pub window: u64,

    /// Configured window length.
    pub window_duration: Microseconds,

    /// Time since the current window started.
    pub window_age: Microseconds,
}

impl Snapshot {
    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }
}

/// Builder for constructing `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    target: String,
    timestamp_ms: Option<u64>,
    statistics: Statistics,
    severity: Severity,
    window: u64,
    window_duration: Microseconds,
    window_age: Microseconds,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    pub fn statistics(mut self, statistics: Statistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the window generation and timing.
    pub fn window(
        mut self,
        generation: u64,
        duration: impl Into<Microseconds>,
        age: impl Into<Microseconds>,
    ) -> Self {
        self.window = generation;
        self.window_duration = duration.into();
        self.window_age = age.into();
        self
    }

    /// Build the snapshot, stamping the current time if none was set.
    pub fn build(self) -> Snapshot {
        Snapshot {
            target: self.target,
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            statistics: self.statistics,
            severity: self.severity,
            window: self.window,
            window_duration: self.window_duration,
            window_age: self.window_age,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_snapshot_builder() {
        let snapshot = Snapshot::builder()
            .target("8.8.8.8")
            .timestamp_ms(1703160000000)
            .statistics(Statistics::from_counts(9, 1))
            .severity(Severity::bucket(1, "degraded"))
            .window(3, Duration::from_secs(300), Duration::from_secs(12))
            .build();

        assert_eq!(snapshot.target, "8.8.8.8");
        assert_eq!(snapshot.timestamp_ms, 1703160000000);
        assert_eq!(snapshot.statistics.loss_percent, Some(10.0));
        assert_eq!(snapshot.window, 3);
        assert_eq!(snapshot.window_duration.as_secs(), 300);
        assert_eq!(snapshot.window_age.as_secs(), 12);
    }

    #[test]
    fn build_stamps_current_time() {
        let before = current_timestamp_ms();
        let snapshot = Snapshot::builder().build();
        assert!(snapshot.timestamp_ms >= before);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let snapshot = Snapshot::builder()
            .target("example.com")
            .timestamp_ms(1703160000000)
            .statistics(Statistics::from_counts(4, 2))
            .severity(Severity::bucket(2, "bad"))
            .build();

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot, parsed);
    }
}
