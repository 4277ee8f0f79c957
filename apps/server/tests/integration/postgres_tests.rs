//! Round sequencing under real concurrency.
//!
//! These tests need a PostgreSQL server, where concurrent transactions on
//! different pooled connections genuinely interleave.

use futures_util::future::join_all;
use game_repository_lib::services::rounds;

use super::helpers::*;

const POOL_SIZE: u32 = 8;

#[actix_rt::test]
#[ignore = "requires PostgreSQL via GR_TEST_DATABASE_URL"]
async fn test_parallel_creates_on_postgres_get_distinct_orders() {
    let pool = create_postgres_pool(POOL_SIZE).await;
    let game = seed_game(&pool).await;

    let creates = (0..32).map(|_| seed_round(&pool, game.id));
    let created = join_all(creates).await;

    let mut orders: Vec<i32> = created.iter().map(|r| r.order).collect();
    orders.sort_unstable();
    assert_eq!(orders, (1..=32).collect::<Vec<_>>());
    assert_gap_free(&pool, game.id).await;

    pool.delete_game(game.id).await.unwrap();
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL via GR_TEST_DATABASE_URL"]
async fn test_parallel_deletes_and_creates_on_postgres_stay_gap_free() {
    let pool = create_postgres_pool(POOL_SIZE).await;
    let game = seed_game(&pool).await;

    let mut seeded = Vec::new();
    for _ in 0..16 {
        seeded.push(seed_round(&pool, game.id).await);
    }

    // Every other round goes away while new ones are appended.
    let deletes = seeded
        .iter()
        .step_by(2)
        .map(|r| rounds::delete_round(&pool, r.id));
    let creates = (0..8).map(|_| seed_round(&pool, game.id));

    let (deleted, created) = futures_util::join!(join_all(deletes), join_all(creates));
    assert!(deleted.iter().all(|r| r.is_ok()));
    assert_eq!(created.len(), 8);

    assert_eq!(round_orders(&pool, game.id).await.len(), 16);
    assert_gap_free(&pool, game.id).await;

    pool.delete_game(game.id).await.unwrap();
}
