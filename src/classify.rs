//! Threshold tables and severity classification.
//!
//! A [`ThresholdTable`] maps a metric value (usually the loss percentage) to
//! a [`Severity`] bucket. Renderers colour their output from the bucket label;
//! the core only decides which bucket applies.

use pingwatch_types::Severity;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One entry of a threshold table: values at or above `min` get `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub min: f64,
    pub label: String,
}

impl Threshold {
    pub fn new(min: f64, label: impl Into<String>) -> Self {
        Self {
            min,
            label: label.into(),
        }
    }
}

/// Ordered, validated list of thresholds.
///
/// Entries are strictly ascending by `min`; the first entry is the floor.
/// Values below the floor are clamped into the first bucket.
///
/// # Example
///
/// ```
/// use pingwatch::{Severity, Threshold, ThresholdTable};
///
/// let table = ThresholdTable::new(vec![
///     Threshold::new(0.0, "good"),
///     Threshold::new(5.0, "degraded"),
///     Threshold::new(20.0, "bad"),
/// ])?;
///
/// assert_eq!(table.classify(Some(7.5)).label(), "degraded");
/// assert_eq!(table.classify(None), Severity::Unknown);
/// # Ok::<(), pingwatch::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    entries: Vec<Threshold>,
}

impl ThresholdTable {
    /// Validate and build a table.
    pub fn new(entries: Vec<Threshold>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyThresholds);
        }

        for entry in &entries {
            if !entry.min.is_finite() {
                return Err(ConfigError::NonFiniteThreshold {
                    label: entry.label.clone(),
                });
            }
        }

        for pair in entries.windows(2) {
            if pair[1].min <= pair[0].min {
                return Err(ConfigError::UnorderedThresholds {
                    label: pair[1].label.clone(),
                    min: pair[1].min,
                    previous: pair[0].min,
                });
            }
        }

        Ok(Self { entries })
    }

    /// Classify a value against this table.
    pub fn classify(&self, value: Option<f64>) -> Severity {
        classify(value, self)
    }

    pub fn entries(&self) -> &[Threshold] {
        &self.entries
    }
}

impl Default for ThresholdTable {
    /// Loss-percentage buckets: any loss is degraded, a quarter lost is bad.
    fn default() -> Self {
        Self {
            entries: vec![
                Threshold::new(0.0, "good"),
                Threshold::new(1.0, "degraded"),
                Threshold::new(25.0, "bad"),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for ThresholdTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<Threshold>::deserialize(deserializer)?;
        ThresholdTable::new(entries).map_err(serde::de::Error::custom)
    }
}

/// Map a value to the bucket of the greatest threshold not above it.
///
/// `None` (no probes yet) and `NaN` map to [`Severity::Unknown`], never to the
/// lowest bucket: no data is not the same as good data.
pub fn classify(value: Option<f64>, table: &ThresholdTable) -> Severity {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return Severity::Unknown,
    };

    // Entries are strictly ascending, so the matches form a prefix.
    let matched = table.entries.partition_point(|t| t.min <= value);
    let rank = matched.saturating_sub(1);
    Severity::bucket(rank, table.entries[rank].label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ThresholdTable {
        ThresholdTable::new(vec![
            Threshold::new(0.0, "good"),
            Threshold::new(10.0, "degraded"),
            Threshold::new(50.0, "bad"),
        ])
        .unwrap()
    }

    #[test]
    fn absent_value_is_unknown() {
        assert_eq!(classify(None, &table()), Severity::Unknown);
        assert_eq!(classify(Some(f64::NAN), &table()), Severity::Unknown);
    }

    #[test]
    fn picks_greatest_threshold_not_above_value() {
        let t = table();
        assert_eq!(classify(Some(0.0), &t), Severity::bucket(0, "good"));
        assert_eq!(classify(Some(9.99), &t), Severity::bucket(0, "good"));
        assert_eq!(classify(Some(10.0), &t), Severity::bucket(1, "degraded"));
        assert_eq!(classify(Some(49.0), &t), Severity::bucket(1, "degraded"));
        assert_eq!(classify(Some(50.0), &t), Severity::bucket(2, "bad"));
        assert_eq!(classify(Some(100.0), &t), Severity::bucket(2, "bad"));
        assert_eq!(classify(Some(f64::INFINITY), &t), Severity::bucket(2, "bad"));
    }

    #[test]
    fn values_below_floor_clamp_to_first_bucket() {
        let t = ThresholdTable::new(vec![
            Threshold::new(5.0, "ok"),
            Threshold::new(20.0, "bad"),
        ])
        .unwrap();
        assert_eq!(classify(Some(1.0), &t), Severity::bucket(0, "ok"));
        assert_eq!(classify(Some(f64::NEG_INFINITY), &t), Severity::bucket(0, "ok"));
    }

    #[test]
    fn classify_is_monotonic() {
        let t = table();
        let values: Vec<f64> = (0..=1000).map(|i| i as f64 * 0.1).collect();
        for pair in values.windows(2) {
            assert!(classify(Some(pair[0]), &t) <= classify(Some(pair[1]), &t));
        }
    }

    #[test]
    fn unknown_is_not_the_lowest_bucket() {
        let t = table();
        assert_ne!(classify(None, &t), classify(Some(0.0), &t));
        assert!(classify(None, &t) < classify(Some(0.0), &t));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            ThresholdTable::new(vec![]),
            Err(ConfigError::EmptyThresholds)
        ));
    }

    #[test]
    fn rejects_unordered_or_duplicate_minimums() {
        let err = ThresholdTable::new(vec![
            Threshold::new(0.0, "good"),
            Threshold::new(50.0, "bad"),
            Threshold::new(10.0, "degraded"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnorderedThresholds { ref label, .. } if label == "degraded"));

        assert!(ThresholdTable::new(vec![
            Threshold::new(0.0, "good"),
            Threshold::new(0.0, "also-good"),
        ])
        .is_err());
    }

    #[test]
    fn rejects_non_finite_minimums() {
        let err = ThresholdTable::new(vec![Threshold::new(f64::NAN, "weird")]).unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteThreshold { .. }));
    }

    #[test]
    fn default_table_is_valid() {
        let default = ThresholdTable::default();
        assert_eq!(ThresholdTable::new(default.entries().to_vec()).unwrap(), default);
        assert_eq!(default.classify(Some(0.0)).label(), "good");
        assert_eq!(default.classify(Some(33.33)).label(), "bad");
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"[{"min": 0, "label": "good"}, {"min": 25, "label": "bad"}]"#;
        let table: ThresholdTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.entries().len(), 2);

        let json = r#"[{"min": 25, "label": "bad"}, {"min": 0, "label": "good"}]"#;
        assert!(serde_json::from_str::<ThresholdTable>(json).is_err());
    }
}
