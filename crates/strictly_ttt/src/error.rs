//! Engine error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// A cell index outside `0..=8` was read or written.
///
/// This is a contract violation by the caller. It is never retried or
/// clamped; the boundary that produced the index owns the failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid cell index {}: {} at {}:{}", index, message, file, line)]
pub struct IndexError {
    /// The offending index as received.
    pub index: i64,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl IndexError {
    /// Creates a new index error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(index: i64, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            index,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::new(format!("Failed to parse config: {}", err))
    }
}

impl From<std::io::Error> for ConfigError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("Failed to read config file: {}", err))
    }
}
