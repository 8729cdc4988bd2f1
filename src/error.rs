//! This module defines all error types used throughout the application.

use std::io;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No credentials available for the ledger gateway
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The ledger returned a record the normalizer cannot parse
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Network failure or ledger gateway unreachable
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// A write was submitted but its confirmation is unknown.
    ///
    /// Ledger writes are not idempotent, so the caller must decide whether
    /// to retry; the client never retries these on its own.
    #[error("Ambiguous outcome for {operation}: submitted but unconfirmed ({detail})")]
    AmbiguousOutcome { operation: String, detail: String },

    /// TUI/visualization errors
    #[error("TUI error: {0}")]
    Tui(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing configuration
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a malformed record error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// Create a transport failure error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    /// Create an access denied error
    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    /// Create an ambiguous outcome error for a write operation
    pub fn ambiguous(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::AmbiguousOutcome {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Errors that fail the current fetch only and leave prior state intact
    pub fn is_retriable(&self) -> bool {
        matches!(self, Error::TransportFailure(_) | Error::MalformedRecord(_))
    }
}

// Implement From traits for common external error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedRecord(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => Error::AccessDenied(err.to_string()),
            _ => Error::TransportFailure(err.to_string()),
        }
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert_eq!(err.to_string(), "test error");

        let err = Error::malformed("bad quantity");
        assert_eq!(err.to_string(), "Malformed record: bad quantity");
    }

    #[test]
    fn test_ambiguous_outcome_message() {
        let err = Error::ambiguous("append_status", "confirmation timed out");
        let msg = err.to_string();
        assert!(msg.contains("append_status"));
        assert!(msg.contains("unconfirmed"));
    }

    #[test]
    fn test_retriable_classification() {
        assert!(Error::transport("down").is_retriable());
        assert!(Error::malformed("junk").is_retriable());
        assert!(!Error::ambiguous("register_product", "lost receipt").is_retriable());
        assert!(!Error::access_denied("no token").is_retriable());
    }
}
