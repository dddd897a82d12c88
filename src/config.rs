//! Monitor configuration.
//!
//! Settings are layered: built-in defaults, then an optional config file
//! (TOML, YAML, JSON... anything the `config` crate recognises by extension),
//! then `PINGWATCH_*` environment variables. Durations accept bare seconds
//! (`interval = 4`) or suffixed values (`window = "5m"`).
//!
//! ```toml
//! target = "1.1.1.1"
//! interval = "4s"
//! timeout = "2s"
//! packet_size = 8
//! window = "5m"
//!
//! [[thresholds]]
//! min = 0
//! label = "good"
//!
//! [[thresholds]]
//! min = 10
//! label = "bad"
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::classify::ThresholdTable;
use crate::duration::{format_duration, parse_duration};
use crate::error::ConfigError;

/// Google Public DNS, reachable from nearly everywhere.
pub const DEFAULT_TARGET: &str = "8.8.8.8";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(4);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_PACKET_SIZE: u32 = 8;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Largest ICMP echo payload that fits in an IPv4 datagram.
pub const MAX_PACKET_SIZE: u32 = 65_507;

/// Upper bound for any duration setting.
const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Environment variable prefix, e.g. `PINGWATCH_TARGET`.
const ENV_PREFIX: &str = "PINGWATCH";

/// Validated settings for a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Host name or address to probe.
    pub target: String,
    /// Time between the start of consecutive probes.
    pub interval: Duration,
    /// How long to wait for a single reply.
    pub timeout: Duration,
    /// Payload bytes per probe.
    pub packet_size: u32,
    /// How long statistics accumulate before being reset.
    pub window: Duration,
    /// Buckets for classifying the loss percentage.
    pub thresholds: ThresholdTable,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            packet_size: DEFAULT_PACKET_SIZE,
            window: DEFAULT_WINDOW,
            thresholds: ThresholdTable::default(),
        }
    }
}

/// Configuration as read from files and the environment, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    target: String,
    interval: String,
    timeout: String,
    packet_size: u32,
    window: String,
    #[serde(default)]
    thresholds: Option<ThresholdTable>,
}

impl MonitorConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("target", DEFAULT_TARGET)?
            .set_default("interval", format_duration(DEFAULT_INTERVAL))?
            .set_default("timeout", format_duration(DEFAULT_TIMEOUT))?
            .set_default("packet_size", i64::from(DEFAULT_PACKET_SIZE))?
            .set_default("window", format_duration(DEFAULT_WINDOW))?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let raw: RawConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let config = Self {
            target: raw.target,
            interval: parse_duration(&raw.interval)?,
            timeout: parse_duration(&raw.timeout)?,
            packet_size: raw.packet_size,
            window: parse_duration(&raw.window)?,
            thresholds: raw.thresholds.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every setting. Called again by the monitor at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_target(&self.target)?;
        validate_duration("interval", self.interval)?;
        validate_duration("timeout", self.timeout)?;
        validate_duration("window", self.window)?;

        if self.packet_size == 0 || self.packet_size > MAX_PACKET_SIZE {
            return Err(ConfigError::PacketSize {
                got: self.packet_size,
                max: MAX_PACKET_SIZE,
            });
        }

        // ThresholdTable can only be constructed valid; nothing to check.
        Ok(())
    }
}

fn validate_target(target: &str) -> Result<(), ConfigError> {
    // A leading '-' would be parsed as an option by the ping binary.
    let valid = !target.is_empty()
        && !target.starts_with('-')
        && !target.chars().any(|c| c.is_whitespace() || c.is_control());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidTarget(target.to_string()))
    }
}

fn validate_duration(name: &'static str, value: Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::ZeroDuration { name });
    }
    if value > MAX_DURATION {
        return Err(ConfigError::DurationTooLarge { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = MonitorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.target, "8.8.8.8");
        assert_eq!(config.interval, Duration::from_secs(4));
        assert_eq!(config.packet_size, 8);
        assert_eq!(config.window, Duration::from_secs(300));
    }

    #[test]
    fn load_from_toml_file() {
        let file = write_config(
            r#"
            target = "1.1.1.1"
            interval = "500ms"
            timeout = 1
            packet_size = 56
            window = "1m"

            [[thresholds]]
            min = 0
            label = "good"

            [[thresholds]]
            min = 10
            label = "bad"
            "#,
        );

        let config = MonitorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.target, "1.1.1.1");
        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.packet_size, 56);
        assert_eq!(config.window, Duration::from_secs(60));
        assert_eq!(config.thresholds.entries().len(), 2);
        assert_eq!(config.thresholds.classify(Some(12.0)).label(), "bad");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(r#"target = "example.com""#);

        let config = MonitorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.target, "example.com");
        assert_eq!(config.interval, DEFAULT_INTERVAL);
        assert_eq!(config.window, DEFAULT_WINDOW);
        assert_eq!(config.thresholds, ThresholdTable::default());
    }

    #[test]
    fn unordered_thresholds_in_file_are_rejected() {
        let file = write_config(
            r#"
            [[thresholds]]
            min = 50
            label = "bad"

            [[thresholds]]
            min = 0
            label = "good"
            "#,
        );

        assert!(MonitorConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn zero_window_in_file_is_rejected() {
        let file = write_config(r#"window = "0s""#);
        let err = MonitorConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration { name: "window" }));
    }

    #[test]
    fn bad_duration_in_file_is_rejected() {
        let file = write_config(r#"interval = "often""#);
        let err = MonitorConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Duration(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = MonitorConfig::load(Some(Path::new("/nonexistent/pingwatch.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn rejects_zero_durations() {
        for field in ["interval", "timeout", "window"] {
            let mut config = MonitorConfig::default();
            match field {
                "interval" => config.interval = Duration::ZERO,
                "timeout" => config.timeout = Duration::ZERO,
                _ => config.window = Duration::ZERO,
            }
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ConfigError::ZeroDuration { name } if name == field));
        }
    }

    #[test]
    fn rejects_huge_durations() {
        let config = MonitorConfig {
            timeout: Duration::MAX,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DurationTooLarge { name: "timeout", .. })
        ));
    }

    #[test]
    fn rejects_bad_targets() {
        for target in ["", "-f", "two words", "host\n"] {
            let config = MonitorConfig {
                target: target.to_string(),
                ..MonitorConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidTarget(_))),
                "target {target:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_packet_sizes() {
        for size in [0, MAX_PACKET_SIZE + 1] {
            let config = MonitorConfig {
                packet_size: size,
                ..MonitorConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::PacketSize { .. })));
        }
    }
}
