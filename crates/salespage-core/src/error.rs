//! Core error types for salespage-core.
//!
//! This module defines the error hierarchy using thiserror. Store operations
//! that face the public page never surface these (they log and fail open);
//! the fallible helpers used by the admin surface return them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for salespage-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

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

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The backend refused the write because it is full
    #[error("Storage quota exceeded writing '{key}' ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Unknown editable field name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Unknown section key
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Unknown collection name
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// No item with this id in the collection
    #[error("No item with id {id} in {collection}")]
    ItemNotFound { collection: String, id: u32 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => match inner.code {
                rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy => {
                    StorageError::Locked
                }
                _ => StorageError::QueryFailed(err.to_string()),
            },
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
