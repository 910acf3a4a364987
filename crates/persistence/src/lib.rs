// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Snapshot persistence for the Cocolu seller desk.
//!
//! The desk is saved whole, as one JSON document under a key. Two
//! backends implement [`SnapshotStore`]:
//!
//! - [`JsonFileStore`] writes `<key>.json` into a data directory (default)
//! - [`SqliteStore`] keeps one row per key in a Diesel-managed `SQLite`
//!   table
//!
//! Loading is lenient: fields that fail to parse are logged and replaced
//! by defaults, and a missing snapshot means an empty desk.
//!
//! [`Autosaver`] saves a running desk on an interval (five minutes by
//! default) and flushes once more at shutdown.
//!
//! ## Migration Strategy
//!
//! `migrations/` holds the `SQLite` schema and is embedded in the binary;
//! pending migrations run whenever a `SqliteStore` opens a database.
//!
//! ## Testing
//!
//! - JSON file tests run in `tempfile` directories
//! - `SQLite` tests use unique shared in-memory databases
//! - Autosave tests run on the tokio test runtime

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod autosave;
mod backend;
mod diesel_schema;
mod error;
mod json_file;
mod sqlite_store;
mod store;

#[cfg(test)]
mod tests;

pub use autosave::{Autosaver, DEFAULT_AUTOSAVE_INTERVAL};
pub use error::PersistenceError;
pub use json_file::JsonFileStore;
pub use sqlite_store::SqliteStore;
pub use store::{
    DEFAULT_SNAPSHOT_KEY, SnapshotStore, load_or_empty, parse_payload, restore_desk, validate_key,
};
