//! Error types raised before the scheduler starts.
//!
//! Once running, the scheduler has no fallible transitions: protocol misuse is
//! reported through `SystemEvent::ProtocolViolation` instead.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rest interval must be a positive number of minutes, got {0}")]
    NonPositiveInterval(i64),

    #[error("rest interval must be longer than zero")]
    ZeroInterval,

    #[error("rest interval must be at most {max} minutes, got {0}", max = crate::config::MAX_INTERVAL_MINUTES)]
    IntervalTooLongMinutes(i64),

    #[error("rest interval must be at most {max} minutes, got {0:?}", max = crate::config::MAX_INTERVAL_MINUTES)]
    IntervalTooLong(Duration),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
