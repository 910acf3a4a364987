// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Periodic snapshotting of a running desk.
//!
//! The snapshot is taken under the desk lock and written from a blocking
//! task, so routing never waits on disk or database I/O. Failed writes are
//! logged and retried on the next tick.
//!
//! The autosaver remembers the `savedAt` stamp of the last snapshot it
//! loaded or wrote. If the stored snapshot carries a different stamp, some
//! other process (an admin subcommand run while the service is up) changed
//! it, and the autosaver refuses to overwrite that change.

use crate::error::PersistenceError;
use crate::store::SnapshotStore;
use chrono::{DateTime, Utc};
use cocolu::{DeskSnapshot, SellerDesk};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Default time between automatic saves.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(300);

const MIN_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(1);

/// Saves a desk's snapshot on an interval and once more at shutdown.
pub struct Autosaver {
    desk: Arc<SellerDesk>,
    store: Arc<dyn SnapshotStore>,
    key: String,
    interval: Duration,
    last_saved_at: Mutex<Option<DateTime<Utc>>>,
}

impl Autosaver {
    /// Creates an autosaver with the default interval.
    #[must_use]
    pub fn new(desk: Arc<SellerDesk>, store: Arc<dyn SnapshotStore>, key: &str) -> Self {
        Self {
            desk,
            store,
            key: key.to_string(),
            interval: DEFAULT_AUTOSAVE_INTERVAL,
            last_saved_at: Mutex::new(None),
        }
    }

    /// Sets the `savedAt` stamp of the snapshot the desk was restored from.
    ///
    /// Without one, any stamped snapshot found in the store counts as a
    /// foreign change.
    #[must_use]
    pub fn with_baseline(self, saved_at: Option<DateTime<Utc>>) -> Self {
        *self.last_saved() = saved_at;
        self
    }

    /// Sets the time between saves.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_AUTOSAVE_INTERVAL);
        self
    }

    /// The time between saves.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Snapshots the desk and writes it immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot was changed by another
    /// process, the write fails, or the blocking task dies.
    pub async fn persist_now(&self) -> Result<(), PersistenceError> {
        let snapshot: DeskSnapshot = self.desk.snapshot(Utc::now());
        let saved_at: Option<DateTime<Utc>> = snapshot.saved_at;
        let expected: Option<DateTime<Utc>> = *self.last_saved();
        let store: Arc<dyn SnapshotStore> = Arc::clone(&self.store);
        let key: String = self.key.clone();

        tokio::task::spawn_blocking(move || {
            save_unless_changed(store.as_ref(), &key, &snapshot, expected)
        })
        .await??;

        *self.last_saved() = saved_at;
        debug!(key = %self.key, "Autosaved desk snapshot");
        Ok(())
    }

    fn last_saved(&self) -> MutexGuard<'_, Option<DateTime<Utc>>> {
        self.last_saved_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Saves on every tick until `shutdown` resolves, then flushes once.
    ///
    /// Save failures are logged and never end the loop.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            key = %self.key,
            location = %self.store.location(),
            interval_secs = self.interval.as_secs_f64(),
            "Autosave started"
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => match self.persist_now().await {
                    Ok(()) => {}
                    Err(err @ PersistenceError::SnapshotChanged { .. }) => {
                        error!(
                            key = %self.key,
                            error = %err,
                            "Stored snapshot changed underneath the running desk; restart to load it"
                        );
                    }
                    Err(err) => warn!(key = %self.key, error = %err, "Autosave failed"),
                },
            }
        }

        match self.persist_now().await {
            Ok(()) => info!(key = %self.key, "Saved final snapshot"),
            Err(err) => warn!(key = %self.key, error = %err, "Final snapshot save failed"),
        }
    }
}

/// Writes `snapshot` unless the stored one carries a stamp other than
/// `expected`.
///
/// A stored snapshot that cannot be read is overwritten.
fn save_unless_changed(
    store: &dyn SnapshotStore,
    key: &str,
    snapshot: &DeskSnapshot,
    expected: Option<DateTime<Utc>>,
) -> Result<(), PersistenceError> {
    match store.load(key) {
        Ok(Some(DeskSnapshot {
            saved_at: Some(stored_at),
            ..
        })) if Some(stored_at) != expected => {
            return Err(PersistenceError::SnapshotChanged {
                key: key.to_string(),
                stored_at,
            });
        }
        Ok(_) => {}
        Err(err) => warn!(key, error = %err, "Could not read stored snapshot; overwriting it"),
    }
    store.save(key, snapshot)
}
