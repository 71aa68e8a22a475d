//! Core error types for dosekeep-core.
//!
//! This module defines the error hierarchy using thiserror. Nothing in here
//! is fatal to the process: the worst outcome of any reminder operation is
//! "no reminder scheduled", which re-running the operation recovers from.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for reminder operations.
#[derive(Error, Debug)]
pub enum ReminderError {
    /// The user or the system refused notification permission.
    #[error("Notification authorization denied")]
    AuthorizationDenied,

    /// The notification gateway failed outside of a single submission
    #[error("Notification gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// An individual trigger submission was rejected
    #[error("Failed to schedule trigger '{identifier}': {message}")]
    Scheduling { identifier: String, message: String },

    /// Some triggers of a scheduling run were rejected, others were submitted
    #[error("{failed} of {total} triggers failed to schedule")]
    PartialFailure { failed: usize, total: usize },

    /// A pending trigger carried a pattern that could not be interpreted
    #[error("Malformed trigger pattern for '{identifier}': {reason}")]
    MalformedTriggerPattern { identifier: String, reason: String },

    /// Intake history could not be read
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by a [`crate::gateway::NotificationGateway`].
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Authorization request failed at the platform level
    #[error("Authorization request failed: {0}")]
    Authorization(String),

    /// The payload or trigger was rejected
    #[error("Trigger rejected: {0}")]
    Rejected(String),

    /// The gateway's backing store could not be read or written
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by an [`crate::storage::IntakeStore`] or the goal file.
#[derive(Error, Debug)]
pub enum StoreError {
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

    /// A stored timestamp could not be parsed
    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// Goal lookup failed
    #[error("Goal '{0}' not found")]
    GoalNotFound(String),

    /// Failed to read/write the goals file
    #[error("Failed to read/write goals file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the goals file
    #[error("Failed to parse goals TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize the goals file
    #[error("Failed to serialize goals TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Failed to access data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to access data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for ReminderError
pub type Result<T, E = ReminderError> = std::result::Result<T, E>;
