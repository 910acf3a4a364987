// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A file could not be read or written.
    Io(String),
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// A snapshot key is empty or contains characters unusable in a file name.
    InvalidKey(String),
    /// A background persistence task panicked or was cancelled.
    TaskFailed(String),
    /// The stored snapshot was written by someone else since this process
    /// last loaded or saved it.
    SnapshotChanged {
        /// The snapshot key.
        key: String,
        /// When the foreign snapshot was saved.
        stored_at: DateTime<Utc>,
    },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::InvalidKey(key) => write!(
                f,
                "Invalid snapshot key '{key}': use letters, digits, '-' or '_'"
            ),
            Self::TaskFailed(msg) => write!(f, "Persistence task failed: {msg}"),
            Self::SnapshotChanged { key, stored_at } => write!(
                f,
                "Snapshot '{key}' was changed by another process at {stored_at}; not overwriting it"
            ),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for PersistenceError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}
