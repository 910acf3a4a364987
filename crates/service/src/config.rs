// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cli::Args;
use crate::error::ServiceError;
use cocolu::{DeskConfig, RankKey, SelectionPolicy};
use cocolu_domain::{BusinessClock, BusinessHours, ScheduleTime, validate_max_clients};
use cocolu_persistence::{JsonFileStore, SnapshotStore, SqliteStore, validate_key};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Validated settings of one service process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Desk settings.
    pub desk: DeskConfig,
    /// Store opening hours, reported to customers.
    pub business_hours: BusinessHours,
    /// Time between automatic snapshots.
    pub autosave_interval: Duration,
    /// Key the snapshot is stored under.
    pub snapshot_key: String,
}

impl ServiceConfig {
    /// Validates command-line settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone, capacity, ranking, business hours
    /// or snapshot key is invalid.
    pub fn from_args(args: &Args) -> Result<Self, ServiceError> {
        let clock: BusinessClock = BusinessClock::from_name(&args.timezone)?;
        let ranking: Vec<RankKey> = RankKey::parse_order(&args.ranking)?;
        let business_hours: BusinessHours = BusinessHours::new(
            &BusinessHours::parse_days(&args.business_days)?,
            ScheduleTime::parse(&args.business_start)?,
            ScheduleTime::parse(&args.business_end)?,
        )?;
        let snapshot_key: String = validate_key(&args.snapshot_key)?.to_string();

        let desk: DeskConfig = DeskConfig {
            default_max_clients: validate_max_clients(args.default_max_clients)?,
            history_limit: args.history_limit.max(1),
            selection: SelectionPolicy {
                fallback: args.fallback,
                ranking,
            },
            ..DeskConfig::new(clock)
        };

        Ok(Self {
            desk,
            business_hours,
            autosave_interval: Duration::from_secs(args.autosave_secs.max(1)),
            snapshot_key,
        })
    }
}

/// Opens the configured snapshot store: the `SQLite` database when one is
/// given, JSON files in the data directory otherwise.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn open_store(args: &Args) -> Result<Arc<dyn SnapshotStore>, ServiceError> {
    let store: Arc<dyn SnapshotStore> = match &args.database {
        Some(path) => {
            info!(path = %path.display(), "Using SQLite snapshot store");
            Arc::new(SqliteStore::new_with_file(path)?)
        }
        None => {
            info!(dir = %args.data_dir.display(), "Using JSON file snapshot store");
            Arc::new(JsonFileStore::new(&args.data_dir)?)
        }
    };
    Ok(store)
}
