//! Error types.

use std::time::Duration;

use thiserror::Error;

/// Invalid monitor configuration. Always raised before the monitor starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Target host is empty or looks like a command-line option.
    #[error("Invalid target {0:?}")]
    InvalidTarget(String),

    /// A duration setting is zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    /// A duration setting is too large to schedule.
    #[error("{name} is too large: {value:?}")]
    DurationTooLarge { name: &'static str, value: Duration },

    /// Packet size is zero or larger than an ICMP payload can be.
    #[error("Packet size must be between 1 and {max} bytes, got {got}")]
    PacketSize { got: u32, max: u32 },

    /// Threshold table has no entries.
    #[error("Threshold table is empty")]
    EmptyThresholds,

    /// A threshold minimum is NaN or infinite.
    #[error("Threshold {label:?} has a non-finite minimum")]
    NonFiniteThreshold { label: String },

    /// Threshold minimums are not strictly ascending.
    #[error("Threshold {label:?} ({min}) must be greater than the previous minimum ({previous})")]
    UnorderedThresholds {
        label: String,
        min: f64,
        previous: f64,
    },

    /// A duration string could not be parsed.
    #[error("Unknown duration format: {0:?}")]
    Duration(String),

    /// Failed to read or deserialize configuration sources.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// A probe that could not be issued at all.
///
/// This is not a loss sample: nothing went out on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The probe program could not be started.
    #[error("Failed to spawn probe: {0}")]
    Spawn(String),

    /// The probe program ran but refused to send (bad host, permissions, ...).
    #[error("Probe failed: {0}")]
    Failed(String),
}

/// Misuse of the monitor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// `start()` was called after `stop()`.
    #[error("Monitor has been stopped and cannot be restarted")]
    AlreadyStopped,
}
