//! Round API handlers.

use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateRoundRequest, Round, Turn, TurnListResponse, UpdateRoundRequest};
use crate::services::rounds;

/// Append a round to a game. The server assigns the next order.
#[utoipa::path(
    post,
    path = "/api/v1/rounds",
    tag = "Rounds",
    request_body = CreateRoundRequest,
    responses(
        (status = 201, description = "Round created", body = Round),
        (status = 404, description = "Game not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_round(
    pool: web::Data<DbPool>,
    body: web::Json<CreateRoundRequest>,
) -> AppResult<HttpResponse> {
    let created = rounds::create_round(&pool, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(Round::from(created)))
}

/// Get a round by ID.
#[utoipa::path(
    get,
    path = "/api/v1/rounds/{round_id}",
    tag = "Rounds",
    params(
        ("round_id" = i64, Path, description = "Round ID")
    ),
    responses(
        (status = 200, description = "Round found", body = Round),
        (status = 404, description = "Round not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_round(pool: web::Data<DbPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let round = rounds::get_round(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Round::from(round)))
}

/// Update a round.
///
/// `order` may only move the round to the last position of its game.
#[utoipa::path(
    put,
    path = "/api/v1/rounds/{round_id}",
    tag = "Rounds",
    params(
        ("round_id" = i64, Path, description = "Round ID")
    ),
    request_body = UpdateRoundRequest,
    responses(
        (status = 200, description = "Round updated", body = Round),
        (status = 400, description = "Order not allowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Round not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_round(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<UpdateRoundRequest>,
) -> AppResult<HttpResponse> {
    let updated = rounds::update_round(&pool, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Round::from(updated)))
}

/// Delete a round. Later rounds of the game move up by one.
#[utoipa::path(
    delete,
    path = "/api/v1/rounds/{round_id}",
    tag = "Rounds",
    params(
        ("round_id" = i64, Path, description = "Round ID")
    ),
    responses(
        (status = 204, description = "Round deleted"),
        (status = 404, description = "Round not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_round(pool: web::Data<DbPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    rounds::delete_round(&pool, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List the turns of a round.
#[utoipa::path(
    get,
    path = "/api/v1/rounds/{round_id}/turns",
    tag = "Rounds",
    params(
        ("round_id" = i64, Path, description = "Round ID")
    ),
    responses(
        (status = 200, description = "Turns of the round", body = TurnListResponse),
        (status = 404, description = "Round not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_round_turns(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let round_id = path.into_inner();

    let turns = pool
        .get_turns_by_round_id(round_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Round {}", round_id)))?;

    Ok(HttpResponse::Ok().json(TurnListResponse {
        turns: turns.into_iter().map(Turn::from).collect(),
    }))
}

/// Configure round routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/rounds").route(web::post().to(create_round)))
        .service(
            web::resource("/rounds/{round_id}")
                .route(web::get().to(get_round))
                .route(web::put().to(update_round))
                .route(web::delete().to(delete_round)),
        )
        .service(web::resource("/rounds/{round_id}/turns").route(web::get().to(list_round_turns)));
}
