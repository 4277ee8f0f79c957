//! Game API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateGameRequest, Game, Round, RoundListResponse, UpdateGameRequest};
use crate::services::rounds;

/// Create a game.
#[utoipa::path(
    post,
    path = "/api/v1/games",
    tag = "Games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = Game),
    )
)]
pub async fn create_game(
    pool: web::Data<DbPool>,
    body: web::Json<CreateGameRequest>,
) -> AppResult<HttpResponse> {
    let created = pool.insert_game(body.into_inner().name).await?;
    info!("Created game {}", created.id);

    Ok(HttpResponse::Created().json(Game::from(created)))
}

/// Get a game by ID.
#[utoipa::path(
    get,
    path = "/api/v1/games/{game_id}",
    tag = "Games",
    params(
        ("game_id" = i64, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Game found", body = Game),
        (status = 404, description = "Game not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_game(pool: web::Data<DbPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let game_id = path.into_inner();

    let game = pool
        .get_game_by_id(game_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Game {}", game_id)))?;

    Ok(HttpResponse::Ok().json(Game::from(game)))
}

/// Update a game.
#[utoipa::path(
    put,
    path = "/api/v1/games/{game_id}",
    tag = "Games",
    params(
        ("game_id" = i64, Path, description = "Game ID")
    ),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Game updated", body = Game),
        (status = 404, description = "Game not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_game(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<UpdateGameRequest>,
) -> AppResult<HttpResponse> {
    let updated = pool
        .update_game(path.into_inner(), body.into_inner().name)
        .await?;
    info!("Updated game {}", updated.id);

    Ok(HttpResponse::Ok().json(Game::from(updated)))
}

/// Delete a game with all of its rounds and turns.
///
/// Stored artifacts of the deleted turns are reclaimed by the cleanup service.
#[utoipa::path(
    delete,
    path = "/api/v1/games/{game_id}",
    tag = "Games",
    params(
        ("game_id" = i64, Path, description = "Game ID")
    ),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Game not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_game(pool: web::Data<DbPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let game_id = path.into_inner();
    pool.delete_game(game_id).await?;
    info!("Deleted game {}", game_id);

    Ok(HttpResponse::NoContent().finish())
}

/// List the rounds of a game in order.
#[utoipa::path(
    get,
    path = "/api/v1/games/{game_id}/rounds",
    tag = "Games",
    params(
        ("game_id" = i64, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Rounds of the game", body = RoundListResponse),
        (status = 404, description = "Game not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_game_rounds(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let rounds = rounds::list_rounds(&pool, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(RoundListResponse {
        rounds: rounds.into_iter().map(Round::from).collect(),
    }))
}

/// Configure game routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/games").route(web::post().to(create_game)))
        .service(
            web::resource("/games/{game_id}")
                .route(web::get().to(get_game))
                .route(web::put().to(update_game))
                .route(web::delete().to(delete_game)),
        )
        .service(web::resource("/games/{game_id}/rounds").route(web::get().to(list_game_rounds)));
}
