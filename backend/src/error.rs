//! Error types for dso-finder

use thiserror::Error;

use crate::ephemeris::EphemerisError;

/// Result type for dso-finder operations
pub type Result<T> = std::result::Result<T, DsoError>;

/// Errors that can surface from the observability engine.
///
/// Darkness-window and per-object failures are recovered locally and never
/// show up here; what remains are configuration problems and failures that
/// escaped local recovery.
#[derive(Error, Debug)]
pub enum DsoError {
    /// Observer location outside the valid ranges
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Sexagesimal coordinate that cannot be parsed
    #[error("Invalid coordinate '{value}': {reason}")]
    InvalidCoordinate { value: String, reason: String },

    /// Search parameters violating documented preconditions
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Ephemeris provider failure
    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),

    /// Configuration file read or parse failure
    #[error("Configuration error: {0}")]
    Config(String),

    /// Delimited export could not be written
    #[error("Export error: {0}")]
    Export(String),
}

impl DsoError {
    pub(crate) fn coordinate(value: impl Into<String>, reason: impl Into<String>) -> Self {
        DsoError::InvalidCoordinate {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
