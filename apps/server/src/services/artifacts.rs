//! Turn artifact storage.
//!
//! Each turn may carry one zip archive stored at
//! `{data_dir}/{year}/{game_id}/{turn_id}.zip`. Uploads are staged in
//! `{data_dir}/.tmp` so the final rename never crosses filesystems, and the
//! catalog row in `metadata` is only written after the rename succeeded.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use crate::db::metadata::upsert_for_turn;
use crate::db::turns::{find_turn_with_round, lock_turn_shared};
use crate::db::DbPool;
use crate::entity::metadata;
use crate::error::{AppError, AppResult};

/// Name of the staging directory inside the data directory.
const STAGING_DIR: &str = ".tmp";

/// Build the on-disk path of a turn's archive.
pub fn artifact_path(data_dir: &Path, year: i32, game_id: i64, turn_id: i64) -> PathBuf {
    data_dir
        .join(year.to_string())
        .join(game_id.to_string())
        .join(format!("{}.zip", turn_id))
}

/// A stored archive opened for download.
#[derive(Debug)]
pub struct ArtifactFile {
    /// File name offered to the client.
    pub filename: String,
    pub path: PathBuf,
    pub file: tokio::fs::File,
}

/// Filesystem side of the artifact pipeline.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    data_dir: PathBuf,
    max_upload_size: u64,
}

impl ArtifactStore {
    pub fn new(data_dir: impl Into<PathBuf>, max_upload_size: u64) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_upload_size,
        }
    }

    /// Whether the data directory exists and is a directory.
    pub async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.data_dir)
            .await
            .is_ok_and(|m| m.is_dir())
    }

    /// Store `body` as the archive of `turn_id`, replacing any previous one.
    ///
    /// The body is staged, checked to be a zip archive, renamed into place
    /// and then cataloged. On any error before the rename the previously
    /// stored archive is left untouched.
    pub async fn store<R>(
        &self,
        pool: &DbPool,
        turn_id: i64,
        body: Option<R>,
    ) -> AppResult<metadata::Model>
    where
        R: AsyncRead + Unpin,
    {
        let (_, owner) = find_turn_with_round(pool.connection(), turn_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Turn {}", turn_id)))?;

        let body = body
            .ok_or_else(|| AppError::InvalidInput("request body is required".to_string()))?;

        let staged = self.stage(body).await?;
        let staged = validate_zip(staged).await?;

        let destination = artifact_path(&self.data_dir, Utc::now().year(), owner.game_id, turn_id);
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let txn = pool.begin().await?;

        // Keeps the turn from being deleted until the catalog row is written.
        lock_turn_shared(&txn, turn_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Turn {}", turn_id)))?;

        persist(staged, destination.clone()).await?;

        let stored = upsert_for_turn(&txn, turn_id, destination.to_string_lossy().into_owned())
            .await?;

        txn.commit().await?;

        info!(
            "Stored artifact for turn {} at {}",
            turn_id,
            destination.display()
        );
        Ok(stored)
    }

    /// Open the stored archive of `turn_id`.
    ///
    /// A catalog row whose file is gone is reported as not found.
    pub async fn open(&self, pool: &DbPool, turn_id: i64) -> AppResult<ArtifactFile> {
        let not_found = || AppError::NotFound(format!("Artifact for turn {}", turn_id));

        let stored = pool
            .get_metadata_by_turn_id(turn_id)
            .await?
            .ok_or_else(not_found)?;

        let path = PathBuf::from(&stored.path);
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "Artifact for turn {} is cataloged but missing at {}",
                    turn_id,
                    path.display()
                );
                return Err(not_found());
            }
            Err(e) => return Err(e.into()),
        };

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.zip", turn_id));

        Ok(ArtifactFile {
            filename,
            path,
            file,
        })
    }

    /// Copy `body` into a new staging file, enforcing the size limit.
    async fn stage<R>(&self, body: R) -> AppResult<NamedTempFile>
    where
        R: AsyncRead + Unpin,
    {
        let staging_dir = self.data_dir.join(STAGING_DIR);
        tokio::fs::create_dir_all(&staging_dir).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create staging directory {}: {}",
                staging_dir.display(),
                e
            ))
        })?;

        let temp = blocking(move || {
            tempfile::Builder::new()
                .prefix("upload-")
                .suffix(".zip")
                .tempfile_in(&staging_dir)
                .map_err(|e| AppError::Storage(format!("Failed to create staging file: {}", e)))
        })
        .await?;

        let mut out = tokio::fs::File::from_std(temp.reopen()?);
        let mut limited = body.take(self.max_upload_size + 1);

        let written = tokio::io::copy(&mut limited, &mut out)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to receive upload: {}", e)))?;

        if written > self.max_upload_size {
            return Err(AppError::PayloadTooLarge(self.max_upload_size));
        }

        out.flush().await?;
        out.sync_all().await?;

        debug!("Staged {} bytes at {}", written, temp.path().display());
        Ok(temp)
    }
}

/// Check that the staged file opens as a zip archive.
///
/// An error drops the staging file, which deletes it.
async fn validate_zip(temp: NamedTempFile) -> AppResult<NamedTempFile> {
    blocking(move || {
        let file = std::fs::File::open(temp.path())?;
        zip::ZipArchive::new(file).map_err(|_| AppError::NotAZip)?;
        Ok(temp)
    })
    .await
}

/// Atomically rename the staged file onto `destination`.
async fn persist(temp: NamedTempFile, destination: PathBuf) -> AppResult<()> {
    blocking(move || {
        temp.persist(&destination).map_err(|e| {
            AppError::Storage(format!(
                "Failed to move artifact to {}: {}",
                destination.display(),
                e.error
            ))
        })?;
        Ok(())
    })
    .await
}

/// Run filesystem work on the blocking pool.
async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Storage(format!("Blocking task failed: {}", e)))?
}
