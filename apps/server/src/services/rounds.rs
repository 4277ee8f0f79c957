//! Round sequencer.
//!
//! Keeps the `order` of every game's rounds equal to `1..=N`. Each mutation
//! runs in one transaction holding the game row lock, so concurrent
//! mutations of the same game are applied one after another while different
//! games never contend.

use tracing::{debug, info};

use crate::db::games::lock_game;
use crate::db::rounds::{self, NewRound, RoundChanges};
use crate::db::DbPool;
use crate::entity::round;
use crate::error::{AppError, AppResult};
use crate::models::{CreateRoundRequest, UpdateRoundRequest};

/// Order assigned to a round appended after `last`.
pub fn next_order(last: Option<i32>) -> i32 {
    last.map_or(1, |order| order + 1)
}

/// Decide the order a round ends up with after an update.
///
/// Returns `Ok(None)` when the round stays where it is. A round can only be
/// moved to the tail of its game (`requested == count`).
pub fn resolve_reorder(current: i32, requested: Option<i32>, count: u64) -> AppResult<Option<i32>> {
    let Some(requested) = requested else {
        return Ok(None);
    };

    if requested == current {
        return Ok(None);
    }

    if u64::try_from(requested).ok() != Some(count) {
        return Err(AppError::InvalidOrder(format!(
            "order {} is not allowed, a round can only move to the last position ({})",
            requested, count
        )));
    }

    Ok(Some(requested))
}

/// Append a round to its game.
pub async fn create_round(pool: &DbPool, req: CreateRoundRequest) -> AppResult<round::Model> {
    let txn = pool.begin().await?;

    lock_game(&txn, req.game_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Game {}", req.game_id)))?;

    let last = rounds::last_round(&txn, req.game_id).await?;
    let order = next_order(last.map(|r| r.order));

    let created = rounds::insert_round(
        &txn,
        NewRound {
            game_id: req.game_id,
            order,
            test_class_id: req.test_class_id,
            started_at: req.started_at,
            closed_at: req.closed_at,
        },
    )
    .await?;

    txn.commit().await?;

    info!(
        "Created round {} (game {}, order {})",
        created.id, created.game_id, created.order
    );
    Ok(created)
}

/// Delete a round and close the gap it leaves in its game.
pub async fn delete_round(pool: &DbPool, id: i64) -> AppResult<()> {
    let txn = pool.begin().await?;

    let found = rounds::find_round(&txn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Round {}", id)))?;

    lock_game(&txn, found.game_id).await?;

    // Re-read under the lock: a concurrent delete may have shifted or removed it.
    let target = rounds::find_round(&txn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Round {}", id)))?;

    rounds::delete_round_row(&txn, target.id).await?;
    let shifted = rounds::shift_down_after(&txn, target.game_id, target.order).await?;

    txn.commit().await?;

    info!(
        "Deleted round {} (game {}, order {}), renumbered {} round(s)",
        target.id, target.game_id, target.order, shifted
    );
    Ok(())
}

/// Update a round's fields and optionally move it to the end of its game.
pub async fn update_round(
    pool: &DbPool,
    id: i64,
    req: UpdateRoundRequest,
) -> AppResult<round::Model> {
    let txn = pool.begin().await?;

    let found = rounds::find_round(&txn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Round {}", id)))?;

    lock_game(&txn, found.game_id).await?;

    let target = rounds::find_round(&txn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Round {}", id)))?;

    let order = match req.order {
        Some(_) => {
            let count = rounds::count_rounds(&txn, target.game_id).await?;
            resolve_reorder(target.order, req.order, count)?
        }
        None => None,
    };

    if let Some(new_order) = order {
        let shifted = rounds::shift_down_after(&txn, target.game_id, target.order).await?;
        debug!(
            "Moving round {} from {} to {}, shifted {} round(s)",
            target.id, target.order, new_order, shifted
        );
    }

    let updated = rounds::update_round_row(
        &txn,
        target,
        RoundChanges {
            order,
            test_class_id: req.test_class_id,
            started_at: req.started_at,
            closed_at: req.closed_at,
        },
    )
    .await?;

    txn.commit().await?;

    Ok(updated)
}

/// Get a round by ID.
pub async fn get_round(pool: &DbPool, id: i64) -> AppResult<round::Model> {
    pool.get_round_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Round {}", id)))
}

/// List a game's rounds in ascending order.
pub async fn list_rounds(pool: &DbPool, game_id: i64) -> AppResult<Vec<round::Model>> {
    if pool.get_game_by_id(game_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Game {}", game_id)));
    }
    pool.get_rounds_by_game_id(game_id).await
}
