//! Database queries for the artifact metadata catalog.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::entity::metadata::{self, ActiveModel, Entity as Metadata};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Get the metadata row of a turn's artifact.
    pub async fn get_metadata_by_turn_id(&self, turn_id: i64) -> AppResult<Option<metadata::Model>> {
        find_by_turn_id(self.connection(), turn_id).await
    }
}

/// Get the metadata row of a turn's artifact on the given connection.
pub async fn find_by_turn_id<C: ConnectionTrait>(
    conn: &C,
    turn_id: i64,
) -> AppResult<Option<metadata::Model>> {
    Metadata::find()
        .filter(metadata::Column::TurnId.eq(turn_id))
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get metadata: {}", e)))
}

/// Insert or update the metadata row keyed by `turn_id` in a single statement.
pub async fn upsert_for_turn<C: ConnectionTrait>(
    conn: &C,
    turn_id: i64,
    path: String,
) -> AppResult<metadata::Model> {
    let now = Utc::now();

    let model = ActiveModel {
        turn_id: Set(Some(turn_id)),
        path: Set(path),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Metadata::insert(model)
        .on_conflict(
            OnConflict::column(metadata::Column::TurnId)
                .update_columns([metadata::Column::Path, metadata::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to upsert metadata: {}", e)))?;

    find_by_turn_id(conn, turn_id)
        .await?
        .ok_or_else(|| AppError::Database(format!("Metadata for turn {} vanished", turn_id)))
}

/// Lock and return every row whose turn has been deleted.
pub async fn lock_orphans<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<metadata::Model>> {
    Metadata::find()
        .filter(metadata::Column::TurnId.is_null())
        .order_by_asc(metadata::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get orphaned metadata: {}", e)))
}

/// Delete metadata rows by ID in one statement.
pub async fn delete_by_ids<C: ConnectionTrait>(conn: &C, ids: Vec<i64>) -> AppResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = Metadata::delete_many()
        .filter(metadata::Column::Id.is_in(ids))
        .exec(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete metadata: {}", e)))?;

    Ok(result.rows_affected)
}
