//! Shared test helpers.

use std::io::{Cursor, Write};

use actix_web::{App, dev::ServiceResponse, test, web};
use game_repository_lib::api;
use game_repository_lib::db::DbPool;
use game_repository_lib::db::turns::NewTurn;
use game_repository_lib::entity::{game, round, turn};
use game_repository_lib::models::CreateRoundRequest;
use game_repository_lib::services::ArtifactStore;
use game_repository_lib::services::rounds;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Default upload limit used by the test store.
pub const TEST_MAX_UPLOAD_SIZE: u64 = 64 * 1024;

/// A migrated database plus an artifact store rooted in a temp directory.
pub struct TestEnv {
    pub pool: DbPool,
    pub store: ArtifactStore,
    pub dir: TempDir,
}

/// Create a fresh migrated in-memory database.
///
/// A single connection keeps the whole test on one SQLite database and
/// makes concurrent transactions queue for it.
pub async fn create_test_pool() -> DbPool {
    let pool = DbPool::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Environment variable naming a scratch PostgreSQL database for the
/// multi-connection tests.
pub const POSTGRES_URL_VAR: &str = "GR_TEST_DATABASE_URL";

/// Connect to the PostgreSQL database named by `GR_TEST_DATABASE_URL` with
/// several pooled connections, and migrate it.
///
/// Unlike the in-memory pool, transactions here really run side by side,
/// so only the game row lock keeps their round orders apart.
pub async fn create_postgres_pool(max_connections: u32) -> DbPool {
    let url = std::env::var(POSTGRES_URL_VAR)
        .unwrap_or_else(|_| panic!("{} must point at a PostgreSQL database", POSTGRES_URL_VAR));
    let pool = DbPool::connect(&url, max_connections)
        .await
        .expect("Failed to connect to PostgreSQL");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

pub async fn create_test_env() -> TestEnv {
    create_test_env_with_limit(TEST_MAX_UPLOAD_SIZE).await
}

pub async fn create_test_env_with_limit(max_upload_size: u64) -> TestEnv {
    let dir = tempfile::tempdir().expect("Failed to create data dir");
    let store = ArtifactStore::new(dir.path(), max_upload_size);
    TestEnv {
        pool: create_test_pool().await,
        store,
        dir,
    }
}

pub async fn seed_game(pool: &DbPool) -> game::Model {
    pool.insert_game("integration".to_string())
        .await
        .expect("Failed to insert game")
}

pub async fn seed_round(pool: &DbPool, game_id: i64) -> round::Model {
    rounds::create_round(
        pool,
        CreateRoundRequest {
            game_id,
            test_class_id: "TestClass".to_string(),
            started_at: None,
            closed_at: None,
        },
    )
    .await
    .expect("Failed to create round")
}

pub async fn seed_turn(pool: &DbPool, round_id: i64, player_id: i64) -> turn::Model {
    pool.insert_turn(NewTurn {
        round_id,
        player_id,
        scores: None,
        is_winner: false,
        started_at: None,
        closed_at: None,
    })
    .await
    .expect("Failed to insert turn")
}

/// Seed a game with one round holding one turn.
pub async fn seed_turn_chain(pool: &DbPool) -> (game::Model, round::Model, turn::Model) {
    let game = seed_game(pool).await;
    let round = seed_round(pool, game.id).await;
    let turn = seed_turn(pool, round.id, 1).await;
    (game, round, turn)
}

/// Orders of a game's rounds as `(round_id, order)` in ascending order.
pub async fn round_orders(pool: &DbPool, game_id: i64) -> Vec<(i64, i32)> {
    rounds::list_rounds(pool, game_id)
        .await
        .expect("Failed to list rounds")
        .into_iter()
        .map(|r| (r.id, r.order))
        .collect()
}

/// Assert that the orders of a game are exactly 1..=N.
pub async fn assert_gap_free(pool: &DbPool, game_id: i64) {
    let orders: Vec<i32> = round_orders(pool, game_id)
        .await
        .into_iter()
        .map(|(_, order)| order)
        .collect();
    let expected: Vec<i32> = (1..=orders.len() as i32).collect();
    assert_eq!(orders, expected, "round orders of game {} have gaps", game_id);
}

/// Build an in-memory zip archive.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, data) in entries {
        writer.start_file(*name, options).expect("Failed to start entry");
        writer.write_all(data).expect("Failed to write entry");
    }

    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Create the HTTP app over the given environment.
pub async fn create_test_app(
    env: &TestEnv,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(env.pool.clone()))
            .app_data(web::Data::new(env.store.clone()))
            .service(web::scope("/api/v1").configure(api::configure_api)),
    )
    .await
}
