//! Database queries for turns.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::entity::round;
use crate::entity::turn::{self, ActiveModel, Entity as Turn};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// Represents a turn to be inserted.
#[derive(Debug, Clone)]
pub struct NewTurn {
    pub round_id: i64,
    pub player_id: i64,
    pub scores: Option<String>,
    pub is_winner: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Result fields recorded on an existing turn. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TurnChanges {
    pub scores: Option<String>,
    pub is_winner: Option<bool>,
    pub started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl DbPool {
    /// Insert a new turn. The round must exist.
    pub async fn insert_turn(&self, new: NewTurn) -> AppResult<turn::Model> {
        if round::Entity::find_by_id(new.round_id)
            .one(self.connection())
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Round {}", new.round_id)));
        }

        let now = Utc::now();

        let model = ActiveModel {
            round_id: Set(new.round_id),
            player_id: Set(new.player_id),
            scores: Set(new.scores),
            is_winner: Set(new.is_winner),
            started_at: Set(new.started_at),
            closed_at: Set(new.closed_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(self.connection()).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::InvalidInput(format!(
                "Player {} already has a turn in round {}",
                new.player_id, new.round_id
            )),
            _ => AppError::Database(format!("Failed to insert turn: {}", e)),
        })?;

        Ok(result)
    }

    /// Get a turn by ID.
    pub async fn get_turn_by_id(&self, id: i64) -> AppResult<Option<turn::Model>> {
        let result = Turn::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get turn: {}", e)))?;

        Ok(result)
    }

    /// Get the turns of a round ordered by player.
    ///
    /// Returns `None` when the round does not exist.
    pub async fn get_turns_by_round_id(
        &self,
        round_id: i64,
    ) -> AppResult<Option<Vec<turn::Model>>> {
        if round::Entity::find_by_id(round_id)
            .one(self.connection())
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let result = Turn::find()
            .filter(turn::Column::RoundId.eq(round_id))
            .order_by_asc(turn::Column::PlayerId)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get turns for round: {}", e)))?;

        Ok(Some(result))
    }

    /// Record results on a turn and bump `updated_at`.
    pub async fn update_turn(&self, id: i64, changes: TurnChanges) -> AppResult<turn::Model> {
        let existing = self
            .get_turn_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Turn {}", id)))?;

        let mut active = existing.into_active_model();

        if let Some(scores) = changes.scores {
            active.scores = Set(Some(scores));
        }
        if let Some(is_winner) = changes.is_winner {
            active.is_winner = Set(is_winner);
        }
        if let Some(started_at) = changes.started_at {
            active.started_at = Set(Some(started_at));
        }
        if let Some(closed_at) = changes.closed_at {
            active.closed_at = Set(Some(closed_at));
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update turn: {}", e)))
    }

    /// Delete a turn.
    ///
    /// The foreign key on `metadata.turn_id` is `ON DELETE SET NULL`, so any
    /// stored artifact stays on disk as an orphan for the cleanup service.
    pub async fn delete_turn(&self, id: i64) -> AppResult<()> {
        let result = Turn::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete turn: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Turn {}", id)));
        }

        Ok(())
    }
}

/// Load a turn together with the round that owns it.
pub async fn find_turn_with_round<C: ConnectionTrait>(
    conn: &C,
    turn_id: i64,
) -> AppResult<Option<(turn::Model, round::Model)>> {
    let found = Turn::find_by_id(turn_id)
        .find_also_related(round::Entity)
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to resolve turn: {}", e)))?;

    Ok(found.and_then(|(turn, round)| round.map(|round| (turn, round))))
}

/// Take a shared lock on a turn so it cannot be deleted before the transaction ends.
pub async fn lock_turn_shared<C: ConnectionTrait>(
    conn: &C,
    turn_id: i64,
) -> AppResult<Option<turn::Model>> {
    Turn::find_by_id(turn_id)
        .lock_shared()
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to lock turn {}: {}", turn_id, e)))
}
