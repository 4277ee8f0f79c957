//! Database queries for games.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QuerySelect, Set};

use crate::entity::game::{self, ActiveModel, Entity as Game};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a new game.
    pub async fn insert_game(&self, name: String) -> AppResult<game::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert game: {}", e)))?;

        Ok(result)
    }

    /// Get a game by ID.
    pub async fn get_game_by_id(&self, id: i64) -> AppResult<Option<game::Model>> {
        let result = Game::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get game: {}", e)))?;

        Ok(result)
    }

    /// Rename a game. A `None` name only bumps `updated_at`.
    pub async fn update_game(&self, id: i64, name: Option<String>) -> AppResult<game::Model> {
        let existing = self
            .get_game_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {}", id)))?;

        let mut active = existing.into_active_model();
        if let Some(name) = name {
            active.name = Set(name);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update game: {}", e)))
    }

    /// Delete a game. Its rounds and turns cascade; their artifacts become orphans.
    pub async fn delete_game(&self, id: i64) -> AppResult<()> {
        let result = Game::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete game: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Game {}", id)));
        }

        Ok(())
    }
}

/// Load a game and take a row lock on it for the rest of the transaction.
///
/// Every mutation of a game's round sequence goes through this lock, which
/// serializes them per game even when the game has no rounds yet.
pub async fn lock_game<C: ConnectionTrait>(conn: &C, id: i64) -> AppResult<Option<game::Model>> {
    Game::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to lock game {}: {}", id, e)))
}
