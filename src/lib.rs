//! # pingwatch
//!
//! A packet loss monitor for status bars. It pings a target on a fixed
//! cadence, counts received and lost probes over a rolling window, and hands
//! out classified snapshots to whatever renders them.
//!
//! ## Architecture
//!
//! ```text
//!              ┌──────────────────────── Monitor ───────────────────────┐
//!              │                                                        │
//!  tick ──────▶│ WindowClock ──due?──▶ StatsWindow::reset()             │
//!              │                                                        │
//!              │ Prober::probe() ──▶ ProbeOutcome ──▶ StatsWindow::record│
//!              │                          │                             │
//!              │                          └─ Error ──▶ ErrorSink         │
//!              └────────────────────────────────────────────────────────┘
//!                                          │
//!  renderer ──▶ Monitor::snapshot() ──▶ Statistics + classify() ──▶ Snapshot
//! ```
//!
//! - **[`probe`]**: the [`Prober`] trait and [`PingProber`], which runs the
//!   system `ping` once per probe
//! - **[`StatsWindow`]**: mutex-guarded counters; the only shared mutable state
//! - **[`WindowClock`]**: decides when the window is due for a reset
//! - **[`classify`]**: maps the loss percentage to a [`Severity`] bucket
//! - **[`Monitor`]**: owns all of the above, runs the probe loop as a tokio
//!   task and serves snapshots
//!
//! ## Usage
//!
//! ```no_run
//! use pingwatch::{ErrorSink, Monitor, MonitorConfig};
//!
//! # tokio_test::block_on(async {
//! let config = MonitorConfig::load(None)?;
//! let (sink, _failures) = ErrorSink::channel(16);
//! let monitor = Monitor::builder().config(config).error_sink(sink).build()?;
//!
//! monitor.start()?;
//! let snapshot = monitor.snapshot();
//! println!("{:?} {}", snapshot.statistics.rounded_loss_percent(), snapshot.severity);
//!
//! monitor.stop().await;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod classify;
pub mod config;
pub mod duration;
pub mod error;
pub mod monitor;
pub mod probe;
pub mod sink;
pub mod stats;
pub mod window;

pub use classify::{classify, Threshold, ThresholdTable};
pub use config::MonitorConfig;
pub use error::{ConfigError, MonitorError, ProbeError};
pub use monitor::{Monitor, MonitorBuilder, MonitorState};
pub use probe::{PingProber, ProbeOutcome, Prober};
pub use sink::{ErrorSink, ProbeFailure};
pub use stats::{StatsWindow, WindowSnapshot};
pub use window::WindowClock;

// Re-export types for convenience
pub use pingwatch_types::{Microseconds, Severity, Snapshot, Statistics};
