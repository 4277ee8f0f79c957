//! Round sequencer tests: gap-free orders under create, delete and reorder.

use futures_util::future::join_all;
use game_repository_lib::error::AppError;
use game_repository_lib::models::{CreateRoundRequest, UpdateRoundRequest};
use game_repository_lib::services::rounds;

use super::helpers::*;

#[actix_rt::test]
async fn test_create_assigns_consecutive_orders() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;

    for expected in 1..=4 {
        let round = seed_round(&pool, game.id).await;
        assert_eq!(round.order, expected);
        assert_eq!(round.game_id, game.id);
    }

    assert_gap_free(&pool, game.id).await;
}

#[actix_rt::test]
async fn test_orders_are_per_game() {
    let pool = create_test_pool().await;
    let first = seed_game(&pool).await;
    let second = seed_game(&pool).await;

    seed_round(&pool, first.id).await;
    seed_round(&pool, first.id).await;
    let other = seed_round(&pool, second.id).await;

    assert_eq!(other.order, 1);
    assert_gap_free(&pool, first.id).await;
    assert_gap_free(&pool, second.id).await;
}

#[actix_rt::test]
async fn test_create_for_missing_game_is_not_found() {
    let pool = create_test_pool().await;

    let result = rounds::create_round(
        &pool,
        CreateRoundRequest {
            game_id: 404,
            test_class_id: "Missing".to_string(),
            started_at: None,
            closed_at: None,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Game 404"));
}

#[actix_rt::test]
async fn test_delete_closes_gap_and_keeps_identities() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;
    let r1 = seed_round(&pool, game.id).await;
    let r2 = seed_round(&pool, game.id).await;
    let r3 = seed_round(&pool, game.id).await;
    let r4 = seed_round(&pool, game.id).await;

    rounds::delete_round(&pool, r2.id).await.unwrap();

    assert_eq!(
        round_orders(&pool, game.id).await,
        vec![(r1.id, 1), (r3.id, 2), (r4.id, 3)]
    );
}

#[actix_rt::test]
async fn test_delete_last_and_first() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;
    let r1 = seed_round(&pool, game.id).await;
    let r2 = seed_round(&pool, game.id).await;
    let r3 = seed_round(&pool, game.id).await;

    rounds::delete_round(&pool, r3.id).await.unwrap();
    assert_eq!(round_orders(&pool, game.id).await, vec![(r1.id, 1), (r2.id, 2)]);

    rounds::delete_round(&pool, r1.id).await.unwrap();
    assert_eq!(round_orders(&pool, game.id).await, vec![(r2.id, 1)]);

    rounds::delete_round(&pool, r2.id).await.unwrap();
    assert!(round_orders(&pool, game.id).await.is_empty());

    // An emptied game starts over at 1.
    assert_eq!(seed_round(&pool, game.id).await.order, 1);
}

#[actix_rt::test]
async fn test_create_after_delete_appends_without_gap() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;
    seed_round(&pool, game.id).await;
    let second = seed_round(&pool, game.id).await;
    seed_round(&pool, game.id).await;

    rounds::delete_round(&pool, second.id).await.unwrap();
    let appended = seed_round(&pool, game.id).await;

    assert_eq!(appended.order, 3);
    assert_gap_free(&pool, game.id).await;
}

#[actix_rt::test]
async fn test_delete_missing_round_is_not_found() {
    let pool = create_test_pool().await;

    let result = rounds::delete_round(&pool, 999).await;
    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Round 999"));
}

#[actix_rt::test]
async fn test_mixed_sequence_stays_gap_free() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;

    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(seed_round(&pool, game.id).await.id);
    }

    for id in [ids[0], ids[3], ids[5]] {
        rounds::delete_round(&pool, id).await.unwrap();
        assert_gap_free(&pool, game.id).await;
    }

    for _ in 0..2 {
        seed_round(&pool, game.id).await;
        assert_gap_free(&pool, game.id).await;
    }

    assert_eq!(round_orders(&pool, game.id).await.len(), 5);
}

// The single SQLite connection queues these transactions. The PostgreSQL
// tests in `postgres_tests.rs` run them side by side.
#[actix_rt::test]
async fn test_concurrent_creates_produce_full_sequence() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;

    let creates = (0..10).map(|_| seed_round(&pool, game.id));
    let created = join_all(creates).await;

    let mut orders: Vec<i32> = created.iter().map(|r| r.order).collect();
    orders.sort_unstable();
    assert_eq!(orders, (1..=10).collect::<Vec<_>>());
    assert_gap_free(&pool, game.id).await;
}

#[actix_rt::test]
async fn test_update_moves_round_to_tail() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;
    let r1 = seed_round(&pool, game.id).await;
    let r2 = seed_round(&pool, game.id).await;
    let r3 = seed_round(&pool, game.id).await;
    let r4 = seed_round(&pool, game.id).await;

    let moved = rounds::update_round(
        &pool,
        r2.id,
        UpdateRoundRequest {
            order: Some(4),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(moved.order, 4);
    assert_eq!(
        round_orders(&pool, game.id).await,
        vec![(r1.id, 1), (r3.id, 2), (r4.id, 3), (r2.id, 4)]
    );
}

#[actix_rt::test]
async fn test_update_rejects_order_other_than_tail() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;
    let r1 = seed_round(&pool, game.id).await;
    let r2 = seed_round(&pool, game.id).await;
    let r3 = seed_round(&pool, game.id).await;

    for order in [0, 2, 4, 7] {
        let result = rounds::update_round(
            &pool,
            r1.id,
            UpdateRoundRequest {
                order: Some(order),
                ..Default::default()
            },
        )
        .await;
        assert!(
            matches!(result, Err(AppError::InvalidOrder(_))),
            "order {order} should be rejected"
        );
    }

    assert_eq!(
        round_orders(&pool, game.id).await,
        vec![(r1.id, 1), (r2.id, 2), (r3.id, 3)]
    );
}

#[actix_rt::test]
async fn test_update_fields_without_moving() {
    let pool = create_test_pool().await;
    let game = seed_game(&pool).await;
    let r1 = seed_round(&pool, game.id).await;
    seed_round(&pool, game.id).await;
    let closed_at = chrono::Utc::now();

    let updated = rounds::update_round(
        &pool,
        r1.id,
        UpdateRoundRequest {
            test_class_id: Some("Renamed".to_string()),
            closed_at: Some(closed_at),
            order: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.order, 1);
    assert_eq!(updated.test_class_id, "Renamed");
    assert!(updated.closed_at.is_some());
    assert!(updated.started_at.is_none());
    assert_gap_free(&pool, game.id).await;
}

#[actix_rt::test]
async fn test_update_missing_round_is_not_found() {
    let pool = create_test_pool().await;

    let result = rounds::update_round(&pool, 31, UpdateRoundRequest::default()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[actix_rt::test]
async fn test_deleting_game_cascades_to_rounds_and_turns() {
    let pool = create_test_pool().await;
    let (game, round, turn) = seed_turn_chain(&pool).await;

    pool.delete_game(game.id).await.unwrap();

    assert!(rounds::get_round(&pool, round.id).await.is_err());
    assert!(pool.get_turn_by_id(turn.id).await.unwrap().is_none());
    assert!(matches!(
        rounds::list_rounds(&pool, game.id).await,
        Err(AppError::NotFound(_))
    ));
}
