//! Error types for the swordctl tooling
//!
//! Provides structured error types for the REST client, the interactive
//! shells, the batch provisioning commands, and the generator patchers.

use thiserror::Error;

/// Unified error type for the tooling
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    // =========================================================================
    // REST Client Errors
    // =========================================================================
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {path}")]
    HttpStatus { status: u16, path: String },

    // =========================================================================
    // Shell Errors
    // =========================================================================
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    // =========================================================================
    // Telemetry Errors
    // =========================================================================
    #[error("Timestamp parse error: {0}")]
    TimestampParse(String),

    #[error("Metric value is not an integer counter: {0}")]
    MetricValueParse(String),

    // =========================================================================
    // Patcher Errors
    // =========================================================================
    #[error("Patch failed at {file}:{line}: {reason}")]
    Patch {
        file: String,
        line: usize,
        reason: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Capacity parse error: {0}")]
    CapacityParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP failures are reported to the user and, in batch commands,
    /// turn into a process exit of 1.
    pub fn is_http_failure(&self) -> bool {
        matches!(self, Error::Http(_) | Error::HttpStatus { .. })
    }

    /// Usage errors abort the current shell command without side effects.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_) | Error::CapacityParse(_))
    }
}

/// Result type alias for the tooling
pub type Result<T> = std::result::Result<T, Error>;
