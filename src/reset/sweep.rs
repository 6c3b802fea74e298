use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::store::ResetStore;

pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    pub dry_run: bool,
    pub batch_size: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub deleted: u64,
}

/// Remove every reset that expired before `now`, in batches.
pub async fn run(
    store: &dyn ResetStore,
    now: DateTime<Utc>,
    options: SweepOptions,
) -> Result<SweepReport, AppError> {
    let expired = store.list_expired(now).await?;
    tracing::info!(
        "Found {} expired PIN reset entries (dry_run={})",
        expired.len(),
        options.dry_run
    );

    let mut report = SweepReport {
        expired: expired.len(),
        deleted: 0,
    };
    if options.dry_run {
        return Ok(report);
    }

    for batch in expired.chunks(options.batch_size.max(1)) {
        report.deleted += store.delete_expired(batch, now).await?;
    }

    tracing::info!("Deleted {} expired PIN reset entries", report.deleted);
    Ok(report)
}
