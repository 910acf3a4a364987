// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_config, create_test_desk, create_test_snapshot, monday_morning,
};
use crate::{
    Autosaver, DEFAULT_AUTOSAVE_INTERVAL, JsonFileStore, PersistenceError, SnapshotStore,
};
use cocolu::{DeskSnapshot, SellerDesk};
use cocolu_domain::SellerStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

/// Counts saves and can be told to fail.
#[derive(Default)]
struct CountingStore {
    saves: AtomicUsize,
    fail: bool,
}

impl SnapshotStore for CountingStore {
    fn save(&self, _key: &str, _snapshot: &DeskSnapshot) -> Result<(), PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PersistenceError::Io(String::from("disk full")));
        }
        Ok(())
    }

    fn load(&self, _key: &str) -> Result<Option<DeskSnapshot>, PersistenceError> {
        Ok(None)
    }

    fn location(&self) -> String {
        String::from("memory")
    }
}

#[test]
fn test_default_interval_is_five_minutes() {
    let desk: Arc<SellerDesk> = Arc::new(create_test_desk());
    let store: Arc<dyn SnapshotStore> = Arc::new(CountingStore::default());

    let autosaver: Autosaver = Autosaver::new(desk, store, "sellers");

    assert_eq!(autosaver.interval(), DEFAULT_AUTOSAVE_INTERVAL);
    assert_eq!(DEFAULT_AUTOSAVE_INTERVAL, Duration::from_secs(300));
}

#[tokio::test]
async fn test_persist_now_writes_snapshot() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let store: Arc<JsonFileStore> = Arc::new(JsonFileStore::new(dir.path()).unwrap());
    let desk: Arc<SellerDesk> = Arc::new(create_test_desk());
    let autosaver: Autosaver = Autosaver::new(Arc::clone(&desk), store.clone(), "sellers");

    autosaver.persist_now().await.unwrap();

    let loaded: DeskSnapshot = store.load("sellers").unwrap().unwrap();
    assert_eq!(loaded.sellers, desk.get_all_sellers());
    assert!(loaded.saved_at.is_some());
}

#[tokio::test]
async fn test_shutdown_flushes_once() {
    let desk: Arc<SellerDesk> = Arc::new(create_test_desk());
    let store: Arc<CountingStore> = Arc::new(CountingStore::default());
    let autosaver: Autosaver = Autosaver::new(desk, store.clone(), "sellers")
        .with_interval(Duration::from_secs(3600));

    autosaver.run(async {}).await;

    assert_eq!(store.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_saves_on_interval_until_shutdown() {
    let desk: Arc<SellerDesk> = Arc::new(create_test_desk());
    let store: Arc<CountingStore> = Arc::new(CountingStore::default());
    let autosaver: Autosaver = Autosaver::new(desk, store.clone(), "sellers")
        .with_interval(Duration::from_millis(10));
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle: tokio::task::JoinHandle<()> = tokio::spawn(autosaver.run(async move {
        let _ = stop_rx.await;
    }));
    tokio::time::sleep(Duration::from_millis(100)).await;
    stop_tx.send(()).unwrap();
    handle.await.unwrap();

    assert!(store.saves.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_failed_saves_do_not_stop_the_loop() {
    let desk: Arc<SellerDesk> = Arc::new(create_test_desk());
    let store: Arc<CountingStore> = Arc::new(CountingStore {
        saves: AtomicUsize::new(0),
        fail: true,
    });
    let autosaver: Autosaver = Autosaver::new(desk, store.clone(), "sellers")
        .with_interval(Duration::from_millis(10));
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle: tokio::task::JoinHandle<()> = tokio::spawn(autosaver.run(async move {
        let _ = stop_rx.await;
    }));
    tokio::time::sleep(Duration::from_millis(60)).await;
    stop_tx.send(()).unwrap();
    handle.await.unwrap();

    assert!(store.saves.load(Ordering::SeqCst) >= 2);
}

/// Stores a snapshot and builds a desk from it, the way the service boots.
fn boot(store: &JsonFileStore) -> (DeskSnapshot, Arc<SellerDesk>) {
    let snapshot: DeskSnapshot = create_test_snapshot();
    store.save("sellers", &snapshot).unwrap();
    let desk: Arc<SellerDesk> = Arc::new(SellerDesk::from_snapshot(
        create_test_config(),
        snapshot.clone(),
    ));
    (snapshot, desk)
}

#[tokio::test]
async fn test_autosave_keeps_snapshot_changed_by_another_process() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let store: Arc<JsonFileStore> = Arc::new(JsonFileStore::new(dir.path()).unwrap());
    let (restored, desk) = boot(&store);
    let autosaver: Autosaver = Autosaver::new(Arc::clone(&desk), store.clone(), "sellers")
        .with_baseline(restored.saved_at);

    let mut edited: DeskSnapshot = restored.clone();
    edited.sellers[0].status = SellerStatus::Offline;
    edited.saved_at = Some(monday_morning() + chrono::Duration::minutes(5));
    store.save("sellers", &edited).unwrap();

    let result: Result<(), PersistenceError> = autosaver.persist_now().await;

    assert!(matches!(
        result,
        Err(PersistenceError::SnapshotChanged { ref key, .. }) if key == "sellers"
    ));
    let stored: DeskSnapshot = store.load("sellers").unwrap().unwrap();
    assert_eq!(stored.sellers[0].status, SellerStatus::Offline);
    assert_eq!(stored.saved_at, edited.saved_at);
}

#[tokio::test]
async fn test_autosave_overwrites_its_own_snapshots() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let store: Arc<JsonFileStore> = Arc::new(JsonFileStore::new(dir.path()).unwrap());
    let (restored, desk) = boot(&store);
    let autosaver: Autosaver = Autosaver::new(Arc::clone(&desk), store.clone(), "sellers")
        .with_baseline(restored.saved_at);

    autosaver.persist_now().await.unwrap();
    autosaver.persist_now().await.unwrap();

    let stored: DeskSnapshot = store.load("sellers").unwrap().unwrap();
    assert_ne!(stored.saved_at, restored.saved_at);
}

#[tokio::test]
async fn test_autosave_without_baseline_leaves_existing_snapshot() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let store: Arc<JsonFileStore> = Arc::new(JsonFileStore::new(dir.path()).unwrap());
    let (restored, desk) = boot(&store);
    let autosaver: Autosaver = Autosaver::new(desk, store.clone(), "sellers");

    let result: Result<(), PersistenceError> = autosaver.persist_now().await;

    assert!(matches!(result, Err(PersistenceError::SnapshotChanged { .. })));
    assert_eq!(
        store.load("sellers").unwrap().unwrap().saved_at,
        restored.saved_at
    );
}
