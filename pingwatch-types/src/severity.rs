//! Severity buckets derived from a threshold table.

use std::fmt;

/// The bucket a metric value falls into.
///
/// Buckets are ordered by rank, and `Unknown` sorts below every bucket, so
/// `max()` over a set of severities picks the worst real bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "kind"))]
pub enum Severity {
    /// No data to classify yet.
    #[default]
    Unknown,

    /// Matched entry `rank` of the threshold table.
    Bucket {
        /// Position of the matched entry, 0 being the lowest threshold.
        rank: usize,
        /// Label of the matched entry, e.g. "good" or "bad".
        label: String,
    },
}

impl Severity {
    /// Create a bucket severity.
    pub fn bucket(rank: usize, label: impl Into<String>) -> Self {
        Severity::Bucket {
            rank,
            label: label.into(),
        }
    }

    /// Returns the label for display, `"unknown"` when there is no data.
    pub fn label(&self) -> &str {
        match self {
            Severity::Unknown => "unknown",
            Severity::Bucket { label, .. } => label,
        }
    }

    /// Returns the bucket rank, or `None` for `Unknown`.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Severity::Unknown => None,
            Severity::Bucket { rank, .. } => Some(*rank),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Severity::Unknown)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
