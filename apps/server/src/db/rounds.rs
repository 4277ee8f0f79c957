//! Database queries for rounds.
//!
//! The free functions take any connection so they can run inside the
//! sequencer's transaction; callers are responsible for holding the game lock.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entity::round::{self, ActiveModel, Entity as Round};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// Represents a round to be inserted.
#[derive(Debug, Clone)]
pub struct NewRound {
    pub game_id: i64,
    pub order: i32,
    pub test_class_id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Field changes applied to an existing round. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct RoundChanges {
    pub order: Option<i32>,
    pub test_class_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl DbPool {
    /// Get a round by ID.
    pub async fn get_round_by_id(&self, id: i64) -> AppResult<Option<round::Model>> {
        find_round(self.connection(), id).await
    }

    /// Get all rounds of a game in ascending order.
    pub async fn get_rounds_by_game_id(&self, game_id: i64) -> AppResult<Vec<round::Model>> {
        let result = Round::find()
            .filter(round::Column::GameId.eq(game_id))
            .order_by_asc(round::Column::Order)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get rounds for game: {}", e)))?;

        Ok(result)
    }
}

/// Get a round by ID on the given connection.
pub async fn find_round<C: ConnectionTrait>(conn: &C, id: i64) -> AppResult<Option<round::Model>> {
    Round::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get round: {}", e)))
}

/// The round with the highest order in a game, if any.
pub async fn last_round<C: ConnectionTrait>(
    conn: &C,
    game_id: i64,
) -> AppResult<Option<round::Model>> {
    Round::find()
        .filter(round::Column::GameId.eq(game_id))
        .order_by_desc(round::Column::Order)
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get last round: {}", e)))
}

/// Number of rounds in a game.
pub async fn count_rounds<C: ConnectionTrait>(conn: &C, game_id: i64) -> AppResult<u64> {
    Round::find()
        .filter(round::Column::GameId.eq(game_id))
        .count(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count rounds: {}", e)))
}

/// Insert a round with an already computed order.
pub async fn insert_round<C: ConnectionTrait>(conn: &C, new: NewRound) -> AppResult<round::Model> {
    let now = Utc::now();

    let model = ActiveModel {
        game_id: Set(new.game_id),
        order: Set(new.order),
        test_class_id: Set(new.test_class_id),
        started_at: Set(new.started_at),
        closed_at: Set(new.closed_at),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert round: {}", e)))
}

/// Delete a round row. Returns the number of rows removed.
pub async fn delete_round_row<C: ConnectionTrait>(conn: &C, id: i64) -> AppResult<u64> {
    let result = Round::delete_by_id(id)
        .exec(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete round: {}", e)))?;

    Ok(result.rows_affected)
}

/// Decrement the order of every round of `game_id` positioned after `order`.
///
/// Closes the gap left at `order`. Returns the number of rounds renumbered.
pub async fn shift_down_after<C: ConnectionTrait>(
    conn: &C,
    game_id: i64,
    order: i32,
) -> AppResult<u64> {
    let result = Round::update_many()
        .col_expr(
            round::Column::Order,
            Expr::col(round::Column::Order).sub(1),
        )
        .col_expr(round::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(round::Column::GameId.eq(game_id))
        .filter(round::Column::Order.gt(order))
        .exec(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to renumber rounds: {}", e)))?;

    Ok(result.rows_affected)
}

/// Write `changes` onto `round` and bump `updated_at`.
pub async fn update_round_row<C: ConnectionTrait>(
    conn: &C,
    round: round::Model,
    changes: RoundChanges,
) -> AppResult<round::Model> {
    let mut active = round.into_active_model();

    if let Some(order) = changes.order {
        active.order = Set(order);
    }
    if let Some(test_class_id) = changes.test_class_id {
        active.test_class_id = Set(test_class_id);
    }
    if let Some(started_at) = changes.started_at {
        active.started_at = Set(Some(started_at));
    }
    if let Some(closed_at) = changes.closed_at {
        active.closed_at = Set(Some(closed_at));
    }
    active.updated_at = Set(Utc::now());

    active
        .update(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update round: {}", e)))
}
