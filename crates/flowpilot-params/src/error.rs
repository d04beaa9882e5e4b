//! Error types for the parameter store.
//!
//! Reads of absent keys, backend outages and malformed values each get their
//! own variant so call sites can decide which ones fall back to a default.

use thiserror::Error;

/// Errors that can occur while reading or writing parameters.
#[derive(Error, Debug)]
pub enum ParamsError {
    /// The key has never been written (or was removed).
    #[error("Parameter not found: {0}")]
    KeyNotFound(String),

    /// The persistence backend cannot be reached.
    #[error("Parameter store unavailable: {0}")]
    StoreUnavailable(String),

    /// The stored value cannot be read as the requested type.
    #[error("Type mismatch for '{key}': expected {expected}, found {found:?}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: String,
    },

    /// The key is not a valid parameter name.
    #[error("Invalid parameter key: {0:?}")]
    InvalidKey(String),

    /// JSON seed or snapshot data could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParamsError {
    /// Create a store-unavailable error from any displayable cause
    pub fn unavailable(cause: impl std::fmt::Display) -> Self {
        ParamsError::StoreUnavailable(cause.to_string())
    }

    /// Check if this is a missing-key error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParamsError::KeyNotFound(_))
    }

    /// Check if this error means the backend is down
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ParamsError::StoreUnavailable(_))
    }
}

/// Result type alias for parameter operations.
pub type ParamsResult<T> = Result<T, ParamsError>;
