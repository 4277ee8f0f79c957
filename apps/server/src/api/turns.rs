//! Turn API handlers, including the turn archive upload and download.

use actix_files::NamedFile;
use actix_web::http::Version;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::info;

use crate::db::turns::{NewTurn, TurnChanges};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ArtifactUploadResponse, CreateTurnRequest, Turn, UpdateTurnRequest};
use crate::services::ArtifactStore;

/// Whether the request carries a body at all.
///
/// HTTP/1.x needs chunked encoding or a non-zero length. HTTP/2 and later
/// frame the body themselves, so without a length their body is assumed
/// present and an empty one fails zip validation.
fn has_body(req: &HttpRequest) -> bool {
    let headers = req.headers();

    if headers.contains_key(header::TRANSFER_ENCODING) {
        return true;
    }

    match headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        Some(len) => len > 0,
        None => req.version() >= Version::HTTP_2,
    }
}

/// Create a turn for a player in a round.
#[utoipa::path(
    post,
    path = "/api/v1/turns",
    tag = "Turns",
    request_body = CreateTurnRequest,
    responses(
        (status = 201, description = "Turn created", body = Turn),
        (status = 400, description = "Player already has a turn in the round", body = crate::error::ErrorResponse),
        (status = 404, description = "Round not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_turn(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTurnRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let created = pool
        .insert_turn(NewTurn {
            round_id: req.round_id,
            player_id: req.player_id,
            scores: req.scores,
            is_winner: req.is_winner,
            started_at: req.started_at,
            closed_at: req.closed_at,
        })
        .await?;

    info!(
        "Created turn {} (round {}, player {})",
        created.id, created.round_id, created.player_id
    );
    Ok(HttpResponse::Created().json(Turn::from(created)))
}

/// Get a turn by ID.
#[utoipa::path(
    get,
    path = "/api/v1/turns/{turn_id}",
    tag = "Turns",
    params(
        ("turn_id" = i64, Path, description = "Turn ID")
    ),
    responses(
        (status = 200, description = "Turn found", body = Turn),
        (status = 404, description = "Turn not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_turn(pool: web::Data<DbPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let turn_id = path.into_inner();

    let turn = pool
        .get_turn_by_id(turn_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Turn {}", turn_id)))?;

    Ok(HttpResponse::Ok().json(Turn::from(turn)))
}

/// Record the result of a turn.
#[utoipa::path(
    put,
    path = "/api/v1/turns/{turn_id}",
    tag = "Turns",
    params(
        ("turn_id" = i64, Path, description = "Turn ID")
    ),
    request_body = UpdateTurnRequest,
    responses(
        (status = 200, description = "Turn updated", body = Turn),
        (status = 404, description = "Turn not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_turn(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<UpdateTurnRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let updated = pool
        .update_turn(
            path.into_inner(),
            TurnChanges {
                scores: req.scores,
                is_winner: req.is_winner,
                started_at: req.started_at,
                closed_at: req.closed_at,
            },
        )
        .await?;

    info!("Updated turn {}", updated.id);
    Ok(HttpResponse::Ok().json(Turn::from(updated)))
}

/// Delete a turn. Its archive is left for the cleanup service.
#[utoipa::path(
    delete,
    path = "/api/v1/turns/{turn_id}",
    tag = "Turns",
    params(
        ("turn_id" = i64, Path, description = "Turn ID")
    ),
    responses(
        (status = 204, description = "Turn deleted"),
        (status = 404, description = "Turn not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_turn(pool: web::Data<DbPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let turn_id = path.into_inner();
    pool.delete_turn(turn_id).await?;
    info!("Deleted turn {}", turn_id);

    Ok(HttpResponse::NoContent().finish())
}

/// Upload the zip archive of a turn as the raw request body.
///
/// Replaces any archive stored earlier for the same turn.
#[utoipa::path(
    put,
    path = "/api/v1/turns/{turn_id}/files",
    tag = "Turns",
    params(
        ("turn_id" = i64, Path, description = "Turn ID")
    ),
    request_body(content = Vec<u8>, content_type = "application/zip"),
    responses(
        (status = 200, description = "Archive stored", body = ArtifactUploadResponse),
        (status = 400, description = "Missing body", body = crate::error::ErrorResponse),
        (status = 404, description = "Turn not found", body = crate::error::ErrorResponse),
        (status = 413, description = "Archive too large", body = crate::error::ErrorResponse),
        (status = 422, description = "Body is not a zip archive", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_artifact(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    store: web::Data<ArtifactStore>,
    path: web::Path<i64>,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let turn_id = path.into_inner();

    let body = has_body(&req).then(|| {
        StreamReader::new(Box::pin(
            payload.map_err(|e| std::io::Error::other(e.to_string())),
        ))
    });

    let stored = store.store(&pool, turn_id, body).await?;

    Ok(HttpResponse::Ok().json(ArtifactUploadResponse::from_metadata(turn_id, &stored)))
}

/// Download the zip archive of a turn.
#[utoipa::path(
    get,
    path = "/api/v1/turns/{turn_id}/files",
    tag = "Turns",
    params(
        ("turn_id" = i64, Path, description = "Turn ID")
    ),
    responses(
        (status = 200, description = "Archive contents", body = Vec<u8>, content_type = "application/zip"),
        (status = 404, description = "No archive stored for the turn", body = crate::error::ErrorResponse),
    )
)]
pub async fn download_artifact(
    pool: web::Data<DbPool>,
    store: web::Data<ArtifactStore>,
    path: web::Path<i64>,
) -> AppResult<NamedFile> {
    let artifact = store.open(&pool, path.into_inner()).await?;

    let file = NamedFile::from_file(artifact.file.into_std().await, &artifact.path)?
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(artifact.filename)],
        });

    Ok(file)
}

/// Configure turn routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/turns").route(web::post().to(create_turn)))
        .service(
            web::resource("/turns/{turn_id}")
                .route(web::get().to(get_turn))
                .route(web::put().to(update_turn))
                .route(web::delete().to(delete_turn)),
        )
        .service(
            web::resource("/turns/{turn_id}/files")
                .route(web::put().to(upload_artifact))
                .route(web::get().to(download_artifact)),
        );
}
