// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backend;
use crate::diesel_schema::state_snapshots;
use crate::error::PersistenceError;
use crate::store::{SnapshotStore, parse_payload, validate_key};
use chrono::Utc;
use cocolu::DeskSnapshot;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// parallel tests never share a database.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores snapshots as rows of the `state_snapshots` table.
pub struct SqliteStore {
    conn: Mutex<SqliteConnection>,
    location: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Creates a store backed by a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_cocolu_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        Ok(Self {
            conn: Mutex::new(conn),
            location: shared_memory_url,
        })
    }

    /// Creates a store backed by a database file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            location: path_str.to_string(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for SqliteStore {
    fn save(&self, key: &str, snapshot: &DeskSnapshot) -> Result<(), PersistenceError> {
        let key: &str = validate_key(key)?;
        let payload: String = serde_json::to_string(snapshot)?;
        let saved_at: String = snapshot.saved_at.unwrap_or_else(Utc::now).to_rfc3339();

        let mut conn = self.lock();
        diesel::replace_into(state_snapshots::table)
            .values((
                state_snapshots::snapshot_key.eq(key),
                state_snapshots::payload.eq(&payload),
                state_snapshots::saved_at.eq(&saved_at),
            ))
            .execute(&mut *conn)?;
        drop(conn);

        debug!(key, saved_at, "Wrote snapshot row");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<DeskSnapshot>, PersistenceError> {
        let key: &str = validate_key(key)?;

        let mut conn = self.lock();
        let payload: Option<String> = state_snapshots::table
            .filter(state_snapshots::snapshot_key.eq(key))
            .select(state_snapshots::payload)
            .first::<String>(&mut *conn)
            .optional()?;
        drop(conn);

        payload.as_deref().map(parse_payload).transpose()
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}
