// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cocolu::CoreError;
use cocolu_domain::DomainError;
use cocolu_persistence::PersistenceError;
use thiserror::Error;

/// Top-level failures of the service binary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] DomainError),
    /// The snapshot store could not be opened or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    /// A desk operation was rejected.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Output could not be encoded.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// The log level is not a valid filter directive.
    #[error("Invalid log level '{level}': {reason}")]
    LogFilter {
        /// The rejected directive.
        level: String,
        /// Why it was rejected.
        reason: String,
    },
}
