//! Liveness and readiness endpoints.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::ErrorResponse;
use crate::services::ArtifactStore;

/// Liveness response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Readiness response, one entry per backing store.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    status: &'static str,
    database: &'static str,
    storage: &'static str,
}

/// Report that the process is up.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is running", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Report whether the database answers and the archive directory exists.
#[utoipa::path(
    get,
    path = "/api/v1/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Database and archive storage are usable", body = ReadyResponse),
        (status = 503, description = "A backing store is unavailable", body = ErrorResponse)
    )
)]
#[get("/ready")]
pub async fn ready(pool: web::Data<DbPool>, store: web::Data<ArtifactStore>) -> HttpResponse {
    let database = match pool.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Readiness: database unavailable: {}", e);
            false
        }
    };

    let storage = store.is_available().await;
    if !storage {
        tracing::warn!("Readiness: archive directory unavailable");
    }

    if database && storage {
        return HttpResponse::Ok().json(ReadyResponse {
            status: "ready",
            database: "connected",
            storage: "available",
        });
    }

    let failed: Vec<&str> = [(database, "database"), (storage, "storage")]
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, name)| name)
        .collect();

    HttpResponse::ServiceUnavailable().json(ErrorResponse {
        error: "NOT_READY".to_string(),
        message: format!("Unavailable: {}", failed.join(", ")),
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
