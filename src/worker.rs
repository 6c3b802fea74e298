use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::reset::sweep::{self, SweepOptions};
use crate::store::DynResetStore;

/// Periodically remove expired resets until shutdown is signaled.
pub fn spawn_sweeper(
    store: DynResetStore,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(run(store, interval, shutdown))
}

async fn run(store: DynResetStore, interval: Duration, mut shutdown: watch::Receiver<bool>) {
    tracing::info!("Expired reset sweeper started (every {}s)", interval.as_secs());

    loop {
        if *shutdown.borrow() {
            break;
        }

        match sweep::run(store.as_ref(), Utc::now(), SweepOptions::default()).await {
            Ok(report) if report.deleted > 0 => {
                tracing::info!("Sweeper removed {} expired resets", report.deleted);
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Sweeper error: {e}"),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => {}
        }
    }

    tracing::info!("Expired reset sweeper stopped");
}
