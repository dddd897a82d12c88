//! # pingwatch-types
//!
//! Plain data types shared between the pingwatch probing engine and whatever
//! renders its output (a status bar, a log line, a dashboard).
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to emit snapshots as JSON
//! - **Invariants by construction**: [`Statistics`] can only be built from counts,
//!   so `transmitted == received + unreachable` always holds
//! - **No data is not good data**: an empty window has no loss percentage and
//!   classifies as [`Severity::Unknown`], never as the lowest bucket
//!
//! ## Features
//!
//! - `serde`: JSON/TOML/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use pingwatch_types::{Severity, Snapshot, Statistics};
//!
//! let stats = Statistics::from_counts(4, 2);
//! assert_eq!(stats.transmitted, 6);
//! assert_eq!(stats.rounded_loss_percent(), Some(33.33));
//!
//! let snapshot = Snapshot::builder()
//!     .target("8.8.8.8")
//!     .statistics(stats)
//!     .severity(Severity::bucket(1, "degraded"))
//!     .build();
//!
//! assert!(snapshot.statistics.has_loss());
//! ```

mod duration;
mod severity;
mod snapshot;
mod statistics;

pub use duration::*;
pub use severity::*;
pub use snapshot::*;
pub use statistics::*;
