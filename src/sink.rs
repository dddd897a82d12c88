//! Where probe issuance failures are reported.

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::ProbeError;

/// A probe that could not be issued, as delivered to an [`ErrorSink`] channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    /// Host the probe was aimed at.
    pub target: String,
    /// Why the probe could not be issued.
    pub error: ProbeError,
}

/// Destination for probe issuance failures.
///
/// Failures are always logged at `warn`. A channel sink also forwards them to
/// a receiver, for callers that surface errors in their own UI.
#[derive(Debug, Clone, Default)]
pub enum ErrorSink {
    /// Log through `tracing` only.
    #[default]
    Log,

    /// Log, and send each failure through a channel.
    ///
    /// Use `ErrorSink::channel()` to create this variant and get the receiver.
    Channel(mpsc::Sender<ProbeFailure>),
}

impl ErrorSink {
    /// Create a channel sink and return both the sink and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pingwatch::ErrorSink;
    ///
    /// let (sink, mut rx) = ErrorSink::channel(16);
    ///
    /// // Later, receive failures
    /// // while let Some(failure) = rx.recv().await {
    /// //     eprintln!("{}: {}", failure.target, failure.error);
    /// // }
    /// ```
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<ProbeFailure>) {
        let (tx, rx) = mpsc::channel(buffer);
        (ErrorSink::Channel(tx), rx)
    }

    /// Report one failure. Never blocks and never fails.
    pub(crate) fn report(&self, target: &str, error: ProbeError) {
        warn!(host = target, %error, "probe could not be issued");

        match self {
            ErrorSink::Log => {}
            ErrorSink::Channel(tx) => {
                // Best effort send (don't block the probe loop if nobody reads)
                let _ = tx.try_send(ProbeFailure {
                    target: target.to_string(),
                    error,
                });
            }
        }
    }
}
