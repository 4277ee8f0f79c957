//! Orphan reclamation tests.

use game_repository_lib::entity::metadata;
use game_repository_lib::services::reclaim_orphans;
use game_repository_lib::services::rounds;
use sea_orm::{EntityTrait, PaginatorTrait};

use super::helpers::*;

async fn catalog_size(env: &TestEnv) -> u64 {
    metadata::Entity::find()
        .count(env.pool.connection())
        .await
        .unwrap()
}

#[actix_rt::test]
async fn test_nothing_to_reclaim() {
    let env = create_test_env().await;
    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_live_artifacts_are_kept() {
    let env = create_test_env().await;
    let (_, _, turn) = seed_turn_chain(&env.pool).await;
    let archive = zip_bytes(&[("x", b"x")]);
    let stored = env
        .store
        .store(&env.pool, turn.id, Some(&archive[..]))
        .await
        .unwrap();

    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 0);
    assert!(std::path::Path::new(&stored.path).exists());
    assert_eq!(catalog_size(&env).await, 1);
}

#[actix_rt::test]
async fn test_deleted_turn_is_reclaimed_once() {
    let env = create_test_env().await;
    let (_, _, turn) = seed_turn_chain(&env.pool).await;
    let archive = zip_bytes(&[("x", b"x")]);
    let stored = env
        .store
        .store(&env.pool, turn.id, Some(&archive[..]))
        .await
        .unwrap();

    env.pool.delete_turn(turn.id).await.unwrap();

    let orphan = metadata::Entity::find_by_id(stored.id)
        .one(env.pool.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(orphan.turn_id, None);
    assert!(std::path::Path::new(&orphan.path).exists());

    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 1);
    assert!(!std::path::Path::new(&stored.path).exists());
    assert_eq!(catalog_size(&env).await, 0);

    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_deleting_round_or_game_orphans_artifacts() {
    let env = create_test_env().await;
    let (game, round, turn) = seed_turn_chain(&env.pool).await;
    let other_round = seed_round(&env.pool, game.id).await;
    let other_turn = seed_turn(&env.pool, other_round.id, 9).await;
    let archive = zip_bytes(&[("x", b"x")]);

    for turn_id in [turn.id, other_turn.id] {
        env.store
            .store(&env.pool, turn_id, Some(&archive[..]))
            .await
            .unwrap();
    }

    rounds::delete_round(&env.pool, round.id).await.unwrap();
    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 1);
    assert_eq!(catalog_size(&env).await, 1);

    env.pool.delete_game(game.id).await.unwrap();
    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 1);
    assert_eq!(catalog_size(&env).await, 0);
}

#[actix_rt::test]
async fn test_already_missing_file_still_reclaims_row() {
    let env = create_test_env().await;
    let (_, _, turn) = seed_turn_chain(&env.pool).await;
    let archive = zip_bytes(&[("x", b"x")]);
    let stored = env
        .store
        .store(&env.pool, turn.id, Some(&archive[..]))
        .await
        .unwrap();

    std::fs::remove_file(&stored.path).unwrap();
    env.pool.delete_turn(turn.id).await.unwrap();

    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 1);
    assert_eq!(catalog_size(&env).await, 0);
}

#[actix_rt::test]
async fn test_undeletable_file_keeps_row_for_next_sweep() {
    let env = create_test_env().await;
    let (_, round, turn) = seed_turn_chain(&env.pool).await;
    let healthy_turn = seed_turn(&env.pool, round.id, 2).await;
    let archive = zip_bytes(&[("x", b"x")]);

    let stuck = env
        .store
        .store(&env.pool, turn.id, Some(&archive[..]))
        .await
        .unwrap();
    env.store
        .store(&env.pool, healthy_turn.id, Some(&archive[..]))
        .await
        .unwrap();

    // A directory in place of the archive cannot be removed as a file.
    std::fs::remove_file(&stuck.path).unwrap();
    std::fs::create_dir(&stuck.path).unwrap();

    env.pool.delete_turn(turn.id).await.unwrap();
    env.pool.delete_turn(healthy_turn.id).await.unwrap();

    // Both orphans are processed even though only one row could be removed.
    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 2);
    assert_eq!(catalog_size(&env).await, 1);

    std::fs::remove_dir(&stuck.path).unwrap();
    assert_eq!(reclaim_orphans(&env.pool).await.unwrap(), 1);
    assert_eq!(catalog_size(&env).await, 0);
}
