// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::protocol::handle_line;
use chrono::{DateTime, Utc};
use cocolu::{DeskSnapshot, SellerDesk};
use cocolu_persistence::{Autosaver, SnapshotStore, load_or_empty};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;
use tracing::{error, info};

/// Answers each input line with one output line until the input ends or
/// `shutdown` resolves.
///
/// # Returns
///
/// The number of lines answered.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub async fn route_lines<R, W, F>(
    desk: &SellerDesk,
    config: &ServiceConfig,
    reader: R,
    mut writer: W,
    shutdown: F,
) -> Result<u64, ServiceError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = reader.lines();
    let mut answered: u64 = 0;
    tokio::pin!(shutdown);

    loop {
        let line: Option<String> = tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown requested");
                None
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };

        if let Some(response) = handle_line(desk, config, &line, Utc::now()) {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            answered += 1;
        }
    }

    Ok(answered)
}

/// Hosts the desk: restores it, autosaves it, routes stdin to stdout, and
/// flushes a final snapshot on EOF or Ctrl-C.
///
/// # Errors
///
/// Returns an error if stdin or stdout fails.
pub async fn serve(
    config: ServiceConfig,
    store: Arc<dyn SnapshotStore>,
) -> Result<(), ServiceError> {
    let snapshot: DeskSnapshot = load_or_empty(store.as_ref(), &config.snapshot_key);
    let restored_at: Option<DateTime<Utc>> = snapshot.saved_at;
    let desk: Arc<SellerDesk> = Arc::new(SellerDesk::from_snapshot(config.desk.clone(), snapshot));
    info!(
        sellers = desk.get_all_sellers().len(),
        timezone = %config.desk.clock.timezone(),
        business_hours = %config.business_hours.describe(),
        "Seller desk ready"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let autosaver: Autosaver = Autosaver::new(Arc::clone(&desk), store, &config.snapshot_key)
        .with_interval(config.autosave_interval)
        .with_baseline(restored_at);
    let autosave_task: tokio::task::JoinHandle<()> = tokio::spawn(autosaver.run(async move {
        let _ = stop_rx.await;
    }));

    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let result: Result<u64, ServiceError> = route_lines(
        &desk,
        &config,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        ctrl_c,
    )
    .await;

    let _ = stop_tx.send(());
    if let Err(err) = autosave_task.await {
        error!(error = %err, "Autosave task ended abnormally");
    }

    let answered: u64 = result?;
    info!(answered, "Seller desk stopped");
    Ok(())
}
