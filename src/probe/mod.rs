//! Probe abstraction for checking reachability of a target.
//!
//! A [`Prober`] issues exactly one reachability check per call and reports
//! how it went as a [`ProbeOutcome`]. Retry policy, scheduling and statistics
//! all live in the [`Monitor`](crate::Monitor); probers stay stateless.

mod ping;

pub use ping::PingProber;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProbeError;

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A reply arrived within the timeout.
    Received,
    /// The network reported the destination as unreachable.
    Unreachable,
    /// No reply and no explicit unreachable signal before the timeout.
    Timeout,
    /// The probe could not be issued. Not a loss sample.
    Error(ProbeError),
}

impl ProbeOutcome {
    /// Whether this outcome counts as a lost packet. Unreachable and timeout
    /// both do.
    pub fn is_loss(&self) -> bool {
        matches!(self, ProbeOutcome::Unreachable | ProbeOutcome::Timeout)
    }

    /// Whether this outcome is a loss sample at all (i.e. not an `Error`).
    pub fn is_sample(&self) -> bool {
        !matches!(self, ProbeOutcome::Error(_))
    }
}

/// Trait for issuing reachability probes.
///
/// Implementations must send at most one probe per call and must not retry
/// internally. The returned future may be dropped at any await point when the
/// monitor is stopped, so implementations must not leave work running after
/// being dropped.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use pingwatch::{ProbeOutcome, Prober};
///
/// #[derive(Debug)]
/// struct AlwaysUp;
///
/// #[async_trait]
/// impl Prober for AlwaysUp {
///     async fn probe(&self, _target: &str, _timeout: Duration, _payload: u32) -> ProbeOutcome {
///         ProbeOutcome::Received
///     }
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync + Debug {
    /// Send one probe to `target` carrying `payload_size` bytes and wait up to
    /// `timeout` for the reply.
    async fn probe(&self, target: &str, timeout: Duration, payload_size: u32) -> ProbeOutcome;
}
