//! Core error types for focusclock-core.
//!
//! The clock and tracker each signal one local, recoverable condition
//! ([`InvalidTransition`] and [`InvalidInput`]). Storage and configuration
//! have their own enums, and [`CoreError`] aggregates everything for callers
//! that just want `?`.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::{ClockCommand, ClockStatus};

/// Core error type for focusclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A clock operation was not legal from the current status
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// A tracker or configuration value was rejected at the boundary
    #[error(transparent)]
    Input(#[from] InvalidInput),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`SessionClock`](crate::SessionClock) operation was attempted from a
/// status that does not allow it. The clock is left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {attempted} while the clock is {from}")]
pub struct InvalidTransition {
    pub attempted: ClockCommand,
    pub from: ClockStatus,
}

/// A non-positive duration or goal was passed in. State is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for '{field}': {value} ({reason})")]
pub struct InvalidInput {
    pub field: &'static str,
    pub value: i64,
    pub reason: &'static str,
}

impl InvalidInput {
    pub(crate) fn not_positive(field: &'static str, value: i64) -> Self {
        Self {
            field,
            value,
            reason: "must be a positive integer",
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg)
                if code.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
