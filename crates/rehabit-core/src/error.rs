//! Core error types for rehabit-core.
//!
//! This module defines the error hierarchy using thiserror. The two
//! domain-specific families are store errors (the remote document
//! database is unreachable or returned something undecodable) and
//! configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rehabit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Store-related errors (assignment, completion, or streak store)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the store adapters.
///
/// A failed read or write aborts the current recalculation pass; the
/// coordinator does not retry, the next enqueue self-heals.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached
    #[error("Store '{store}' unavailable: {message}")]
    Unavailable { store: &'static str, message: String },

    /// A read or write did not complete in time
    #[error("Store '{store}' timed out after {timeout_secs} seconds")]
    Timeout {
        store: &'static str,
        timeout_secs: u64,
    },

    /// A stored document could not be decoded
    #[error("Failed to decode document for user '{user_id}': {message}")]
    Decode { user_id: String, message: String },

    /// Subscription could not be established
    #[error("Subscription failed for user '{user_id}': {message}")]
    Subscription { user_id: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
