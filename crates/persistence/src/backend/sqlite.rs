// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.

use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// Embedded `SQLite` migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Initialize a `SQLite` database at the given URL and run migrations.
///
/// # Arguments
///
/// * `database_url` - The `SQLite` database URL (a file path or a
///   `file:...?mode=memory` URI)
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Initializing SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    // NOTE: PRAGMA is raw SQL (Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA busy_timeout = 5000")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Enable WAL mode for file-based `SQLite` databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}
