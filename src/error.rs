//! Error types for parsing, validation and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors turning a user-supplied time expression into a countdown length
#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("Invalid time format")]
    InvalidFormat(String),

    #[error("Time must be greater than 0")]
    NotPositive,

    #[error("Time exceeds maximum of {limit}\nYou requested: {requested}")]
    ExceedsMaximum { limit: String, requested: String },
}

/// One violated bound on the alert flags
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Frequency must be between 37 and 32767 Hz (got {0})")]
    Frequency(i64),

    #[error("Number of beeps must be at least 1 (got {0})")]
    Beeps(i64),

    #[error("Beep duration must be at least 1 millisecond (got {0})")]
    BeepDuration(i64),

    #[error("Beep gap cannot be negative (got {0})")]
    Gap(i64),
}

/// Errors reading or creating the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config template {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
