// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use cocolu::{DeskConfig, DeskSnapshot, SellerDesk};
use serde_json::Value;
use tracing::{info, warn};

/// Key under which the desk snapshot is stored by default.
pub const DEFAULT_SNAPSHOT_KEY: &str = "sellers";

/// A place desk snapshots can be saved to and loaded from, by key.
///
/// Implementations must be usable from a blocking task, so they are
/// `Send + Sync` and take `&self`.
pub trait SnapshotStore: Send + Sync {
    /// Saves a snapshot under `key`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    fn save(&self, key: &str, snapshot: &DeskSnapshot) -> Result<(), PersistenceError>;

    /// Loads the snapshot stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been saved under `key` yet.
    /// Stored JSON is read leniently: damaged fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid, the read fails, or the
    /// stored payload is not JSON at all.
    fn load(&self, key: &str) -> Result<Option<DeskSnapshot>, PersistenceError>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Checks that a key is usable as a file stem and a table key.
///
/// # Errors
///
/// Returns an error if the key is empty or contains anything other than
/// ASCII letters, digits, `-` or `_`.
pub fn validate_key(key: &str) -> Result<&str, PersistenceError> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(PersistenceError::InvalidKey(key.to_string()));
    }
    Ok(key)
}

/// Parses a stored payload into a snapshot.
///
/// # Errors
///
/// Returns an error if the payload is not valid JSON.
pub fn parse_payload(payload: &str) -> Result<DeskSnapshot, PersistenceError> {
    let value: Value = serde_json::from_str(payload)?;
    Ok(DeskSnapshot::from_json_value(&value))
}

/// Loads the snapshot under `key`, or an empty one.
///
/// A missing snapshot is normal on first boot and is logged as a warning.
/// A failed load is logged and also yields an empty snapshot.
#[must_use]
pub fn load_or_empty(store: &dyn SnapshotStore, key: &str) -> DeskSnapshot {
    match store.load(key) {
        Ok(Some(snapshot)) => {
            info!(
                key,
                location = %store.location(),
                sellers = snapshot.sellers.len(),
                "Loaded desk snapshot"
            );
            snapshot
        }
        Ok(None) => {
            warn!(key, location = %store.location(), "No saved snapshot; starting empty");
            DeskSnapshot::empty()
        }
        Err(err) => {
            warn!(
                key,
                location = %store.location(),
                error = %err,
                "Could not load snapshot; starting empty"
            );
            DeskSnapshot::empty()
        }
    }
}

/// Builds a desk from whatever is stored under `key`.
#[must_use]
pub fn restore_desk(store: &dyn SnapshotStore, key: &str, config: DeskConfig) -> SellerDesk {
    SellerDesk::from_snapshot(config, load_or_empty(store, key))
}
