//! Error types for CompanionMind
//!
//! Classification, analysis, sensor updates and risk fusion are total and
//! never produce these. Only the boundaries do: config, server, subject
//! lookup, and reply generation.

use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Reply generator failed
    #[error("reply generation failed: {0}")]
    Reply(String),

    /// Reply generator exceeded its time bound
    #[error("reply generation timed out after {0}s")]
    ReplyTimeout(u64),

    /// Subject not registered
    #[error("subject not found: {0}")]
    SubjectNotFound(String),

    /// Subject already registered
    #[error("subject already exists: {0}")]
    SubjectExists(String),

    /// Default subject cannot be removed
    #[error("subject cannot be removed: {0}")]
    SubjectPinned(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
