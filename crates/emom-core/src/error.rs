//! Core error types for emom-core.
//!
//! The timer engine and the pure time/streak arithmetic never fail; these
//! errors belong to the collaborators around them (storage, configuration,
//! token store, cloud sync).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for emom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// OAuth token errors
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// Cloud sync errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// A stored row could not be decoded
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be resolved or created
    #[error("Data directory unavailable at {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

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
}

/// Access token errors.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// Access token expired
    #[error("Access token for {service} expired")]
    TokenExpired { service: String },

    /// Not authenticated
    #[error("Not authenticated with {service}")]
    NotAuthenticated { service: String },

    /// Token payload could not be read back
    #[error("Stored token for {service} is unreadable: {message}")]
    Unreadable { service: String, message: String },
}

/// Cloud sync errors.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No usable access token
    #[error(transparent)]
    Auth(#[from] OAuthError),

    /// Transport-level failure
    #[error("Request to {service} failed: {source}")]
    Request {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("{service} rejected {operation} with status {status}: {body}")]
    Rejected {
        service: String,
        operation: String,
        status: u16,
        body: String,
    },

    /// Base URL could not be parsed
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}
