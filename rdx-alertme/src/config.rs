//! Defines the configuration for the rest scheduler.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `ALERTME_*` environment variables, then explicit
//! overrides (typically from the command line). The raw values are validated
//! into a `RestConfig` before the scheduler is ever constructed.

use crate::error::ConfigError;
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_INTERVAL_MINUTES: i64 = 25;
/// The longest accepted interval: one year.
pub const MAX_INTERVAL_MINUTES: i64 = 365 * 24 * 60;
pub const DEFAULT_NOTIFICATION_TEXT: &str =
    "You need to rest! Press 'Continue button' after the rest";
const ENV_PREFIX: &str = "ALERTME";

/// The time between the resolution of one rest session and the next notification.
///
/// An `Interval` is always longer than zero and no longer than
/// `MAX_INTERVAL_MINUTES`, so arming a timer with it can never overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval(Duration);

impl Interval {
    /// Creates an interval from an arbitrary duration, rejecting zero and
    /// anything longer than `MAX_INTERVAL_MINUTES`.
    pub fn new(duration: Duration) -> Result<Self, ConfigError> {
        if duration.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if duration > max_interval() {
            return Err(ConfigError::IntervalTooLong(duration));
        }
        Ok(Self(duration))
    }

    /// Creates an interval from a whole number of minutes, rejecting values
    /// below one or above `MAX_INTERVAL_MINUTES`.
    pub fn from_minutes(minutes: i64) -> Result<Self, ConfigError> {
        if minutes <= 0 {
            return Err(ConfigError::NonPositiveInterval(minutes));
        }
        if minutes > MAX_INTERVAL_MINUTES {
            return Err(ConfigError::IntervalTooLongMinutes(minutes));
        }
        Ok(Self(Duration::from_secs(minutes.unsigned_abs() * 60)))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self(Duration::from_secs(DEFAULT_INTERVAL_MINUTES.unsigned_abs() * 60))
    }
}

/// The validated configuration for a `RestScheduler`.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Time from one resolution to the next notification.
    pub interval: Interval,

    /// Timezone used when presenting wall-clock session start times.
    pub timezone: Tz,

    /// The prompt carried by every `ShowNotification` effect.
    pub notification_text: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            interval: Interval::default(),
            timezone: Tz::UTC,
            notification_text: DEFAULT_NOTIFICATION_TEXT.to_string(),
        }
    }
}

/// Explicit values that take precedence over every other configuration source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub interval_minutes: Option<i64>,
}

/// The configuration exactly as it was read, before validation.
#[derive(Debug, Deserialize)]
struct RawRestConfig {
    interval_minutes: i64,
    #[serde(default = "default_timezone")]
    timezone: Tz,
    #[serde(default = "default_notification_text")]
    notification_text: String,
}

impl RestConfig {
    /// Loads and validates configuration from all layered sources.
    ///
    /// A missing file at `path` is not an error; the remaining layers still apply.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("interval_minutes", DEFAULT_INTERVAL_MINUTES)?
            .set_default("timezone", "UTC")?
            .set_default("notification_text", DEFAULT_NOTIFICATION_TEXT)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("interval_minutes", overrides.interval_minutes)?
            .build()?;
        Self::from_settings(settings)
    }

    /// Validates an already-built `config::Config`.
    pub fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let raw: RawRestConfig = settings.try_deserialize()?;
        Ok(Self {
            interval: Interval::from_minutes(raw.interval_minutes)?,
            timezone: raw.timezone,
            notification_text: raw.notification_text,
        })
    }
}

fn max_interval() -> Duration {
    Duration::from_secs(MAX_INTERVAL_MINUTES.unsigned_abs() * 60)
}

// --- Default value functions for serde ---

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_notification_text() -> String {
    DEFAULT_NOTIFICATION_TEXT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<RestConfig, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        RestConfig::from_settings(settings)
    }

    #[test]
    fn interval_from_minutes_rejects_non_positive() {
        assert!(matches!(
            Interval::from_minutes(0),
            Err(ConfigError::NonPositiveInterval(0))
        ));
        assert!(matches!(
            Interval::from_minutes(-5),
            Err(ConfigError::NonPositiveInterval(-5))
        ));
    }

    #[test]
    fn interval_from_minutes_converts_to_seconds() {
        let interval = Interval::from_minutes(25).unwrap();
        assert_eq!(interval.as_duration(), Duration::from_secs(25 * 60));
        assert_eq!(interval, Interval::default());
    }

    #[test]
    fn interval_from_minutes_rejects_values_past_the_ceiling() {
        assert!(Interval::from_minutes(MAX_INTERVAL_MINUTES).is_ok());
        assert!(matches!(
            Interval::from_minutes(MAX_INTERVAL_MINUTES + 1),
            Err(ConfigError::IntervalTooLongMinutes(_))
        ));
        assert!(matches!(
            Interval::from_minutes(i64::MAX),
            Err(ConfigError::IntervalTooLongMinutes(i64::MAX))
        ));
        assert!(matches!(
            Interval::from_minutes(200_000_000_000_000_000),
            Err(ConfigError::IntervalTooLongMinutes(_))
        ));
    }

    #[test]
    fn interval_new_rejects_durations_past_the_ceiling() {
        assert!(Interval::new(max_interval()).is_ok());
        assert!(matches!(
            Interval::new(max_interval() + Duration::from_secs(1)),
            Err(ConfigError::IntervalTooLong(_))
        ));
        assert!(matches!(
            Interval::new(Duration::MAX),
            Err(ConfigError::IntervalTooLong(Duration::MAX))
        ));
    }

    #[test]
    fn settings_reject_interval_past_the_ceiling() {
        assert!(matches!(
            from_toml("interval_minutes = 9223372036854775807"),
            Err(ConfigError::IntervalTooLongMinutes(i64::MAX))
        ));
    }

    #[test]
    fn interval_new_rejects_zero() {
        assert!(matches!(
            Interval::new(Duration::ZERO),
            Err(ConfigError::ZeroInterval)
        ));
        assert!(Interval::new(Duration::from_millis(1)).is_ok());
    }

    #[test]
    fn settings_apply_defaults_for_optional_keys() {
        let config = from_toml("interval_minutes = 10").unwrap();
        assert_eq!(config.interval.as_duration(), Duration::from_secs(600));
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.notification_text, DEFAULT_NOTIFICATION_TEXT);
    }

    #[test]
    fn settings_read_timezone_and_text() {
        let config = from_toml(
            r#"
            interval_minutes = 50
            timezone = "Europe/Berlin"
            notification_text = "Stand up"
            "#,
        )
        .unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.notification_text, "Stand up");
    }

    #[test]
    fn settings_reject_non_positive_interval() {
        assert!(matches!(
            from_toml("interval_minutes = 0"),
            Err(ConfigError::NonPositiveInterval(0))
        ));
    }

    #[test]
    fn settings_reject_unknown_timezone() {
        let result = from_toml(
            r#"
            interval_minutes = 5
            timezone = "Mars/Olympus"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn load_prefers_override_and_tolerates_missing_file() {
        let config = RestConfig::load(
            Some(Path::new("/nonexistent/alertme.toml")),
            ConfigOverrides {
                interval_minutes: Some(3),
            },
        )
        .unwrap();
        assert_eq!(config.interval.as_duration(), Duration::from_secs(180));
    }

    #[test]
    fn load_rejects_negative_override() {
        let result = RestConfig::load(
            None,
            ConfigOverrides {
                interval_minutes: Some(-1),
            },
        );
        assert!(matches!(result, Err(ConfigError::NonPositiveInterval(-1))));
    }
}
