//! Cleanup service for reclaiming orphaned turn artifacts.
//!
//! Deleting a turn (directly or through its round or game) nulls the
//! `turn_id` of its metadata row. This service periodically removes those
//! rows together with the archives they point to.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::db::metadata::{delete_by_ids, lock_orphans};
use crate::db::DbPool;
use crate::error::AppResult;

/// Configuration for the cleanup service.
#[derive(Clone)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_secs: u64,
}

/// Start the cleanup background task.
///
/// This spawns a tokio task that reclaims orphaned artifacts every
/// `interval_secs`. The first sweep runs immediately.
pub fn start_cleanup_task(pool: Arc<DbPool>, config: CleanupConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting cleanup service (interval: {} seconds)",
            config.interval_secs
        );

        let mut ticker = interval(Duration::from_secs(config.interval_secs));

        loop {
            ticker.tick().await;

            if let Err(e) = reclaim_orphans(&pool).await {
                error!("Cleanup task error: {}", e);
            }
        }
    })
}

/// Run a single cleanup cycle. Returns the number of orphaned rows processed.
///
/// Files that are already gone count as removed. A row whose file cannot be
/// deleted is kept and retried on the next cycle, but still counts as
/// processed.
pub async fn reclaim_orphans(pool: &DbPool) -> AppResult<u64> {
    let txn = pool.begin().await?;

    let orphans = lock_orphans(&txn).await?;
    if orphans.is_empty() {
        return Ok(0);
    }

    let mut reclaimed = Vec::with_capacity(orphans.len());
    let mut error_count = 0;

    for orphan in &orphans {
        match tokio::fs::remove_file(&orphan.path).await {
            Ok(()) => reclaimed.push(orphan.id),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => reclaimed.push(orphan.id),
            Err(e) => {
                warn!("Failed to delete orphaned artifact {}: {}", orphan.path, e);
                error_count += 1;
            }
        }
    }

    let processed = orphans.len() as u64;
    let deleted = delete_by_ids(&txn, reclaimed).await?;
    txn.commit().await?;

    info!(
        processed,
        deleted,
        errors = error_count,
        "Orphaned artifacts cleanup: {} deleted, {} errors",
        deleted,
        error_count
    );

    Ok(processed)
}
