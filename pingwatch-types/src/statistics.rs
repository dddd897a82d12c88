//! Loss statistics for one window of probes.

/// Counters for the probes sent during the current window.
///
/// Build values with [`Statistics::default`] or [`Statistics::from_counts`]:
/// both keep `transmitted == received + unreachable` and derive
/// `loss_percent` from the counters. The fields stay public for renderers, so
/// a hand-assembled or deserialized value is not checked; use
/// [`Statistics::is_consistent`] on data from outside the monitor.
///
/// # Example
///
/// ```rust
/// use pingwatch_types::Statistics;
///
/// let empty = Statistics::default();
/// assert_eq!(empty.loss_percent, None);
///
/// let stats = Statistics::from_counts(3, 1);
/// assert_eq!(stats.transmitted, 4);
/// assert_eq!(stats.loss_percent, Some(25.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Probes that produced a loss sample (received or lost).
    pub transmitted: u64,

    /// Probes answered within the timeout.
    pub received: u64,

    /// Probes that timed out or were reported unreachable.
    pub unreachable: u64,

    /// `100 * unreachable / transmitted`, absent while nothing was transmitted.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub loss_percent: Option<f64>,
}

impl Statistics {
    /// Build statistics from received and lost counts.
    pub fn from_counts(received: u64, unreachable: u64) -> Self {
        let transmitted = received + unreachable;
        Self {
            transmitted,
            received,
            unreachable,
            loss_percent: loss_percent(transmitted, unreachable),
        }
    }

    /// Loss percentage rounded to two decimal places.
    pub fn rounded_loss_percent(&self) -> Option<f64> {
        self.loss_percent.map(|p| (p * 100.0).round() / 100.0)
    }

    /// Whether any probe in the window was lost.
    ///
    /// Status lines that hide themselves on a clean link key off this.
    pub fn has_loss(&self) -> bool {
        self.unreachable > 0
    }

    /// Whether no probe has been transmitted in this window yet.
    pub fn is_empty(&self) -> bool {
        self.transmitted == 0
    }

    /// Whether the counters add up and `loss_percent` matches them.
    pub fn is_consistent(&self) -> bool {
        self.received.checked_add(self.unreachable) == Some(self.transmitted)
            && self.loss_percent == loss_percent(self.transmitted, self.unreachable)
    }
}

fn loss_percent(transmitted: u64, unreachable: u64) -> Option<f64> {
    if transmitted == 0 {
        return None;
    }
    Some(100.0 * unreachable as f64 / transmitted as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_loss_percent() {
        let stats = Statistics::default();
        assert_eq!(stats.transmitted, 0);
        assert_eq!(stats.loss_percent, None);
        assert_eq!(stats.rounded_loss_percent(), None);
        assert!(stats.is_empty());
    }

    #[test]
    fn transmitted_is_sum_of_outcomes() {
        for (r, u) in [(0, 1), (1, 0), (7, 3), (100, 0), (0, 100)] {
            let stats = Statistics::from_counts(r, u);
            assert_eq!(stats.transmitted, r + u);
            let expected = 100.0 * u as f64 / (r + u) as f64;
            assert!((stats.loss_percent.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn from_zero_counts_is_empty() {
        assert_eq!(Statistics::from_counts(0, 0), Statistics::default());
    }

    #[test]
    fn two_of_six_rounds_to_33_33() {
        let stats = Statistics::from_counts(4, 2);
        assert_eq!(stats.transmitted, 6);
        assert_eq!(stats.rounded_loss_percent(), Some(33.33));
    }

    #[test]
    fn has_loss_only_with_unreachable_samples() {
        assert!(!Statistics::from_counts(10, 0).has_loss());
        assert!(Statistics::from_counts(10, 1).has_loss());
    }

    #[test]
    fn hand_built_counters_are_checked_for_consistency() {
        assert!(Statistics::default().is_consistent());
        assert!(Statistics::from_counts(4, 2).is_consistent());

        let mismatched = Statistics {
            transmitted: 5,
            ..Statistics::from_counts(4, 2)
        };
        assert!(!mismatched.is_consistent());

        let stale_percent = Statistics {
            loss_percent: Some(0.0),
            ..Statistics::from_counts(4, 2)
        };
        assert!(!stale_percent.is_consistent());

        let overflowing = Statistics {
            transmitted: u64::MAX,
            received: u64::MAX,
            unreachable: 1,
            loss_percent: None,
        };
        assert!(!overflowing.is_consistent());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_counters_are_not_trusted() {
        let json = r#"{"transmitted":3,"received":1,"unreachable":1}"#;
        let parsed: Statistics = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_consistent());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn empty_window_omits_loss_percent() {
        let json = serde_json::to_string(&Statistics::default()).unwrap();
        assert!(!json.contains("loss_percent"));

        let parsed: Statistics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.loss_percent, None);
    }
}
