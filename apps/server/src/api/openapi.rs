//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Game Repository Server",
        version = "0.4.0",
        description = "Records games, their ordered rounds and per-player turns, and stores one zip archive per turn"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Game endpoints
        api::games::create_game,
        api::games::get_game,
        api::games::update_game,
        api::games::delete_game,
        api::games::list_game_rounds,
        // Round endpoints
        api::rounds::create_round,
        api::rounds::get_round,
        api::rounds::update_round,
        api::rounds::delete_round,
        api::rounds::list_round_turns,
        // Turn endpoints
        api::turns::create_turn,
        api::turns::get_turn,
        api::turns::update_turn,
        api::turns::delete_turn,
        api::turns::upload_artifact,
        api::turns::download_artifact,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Games
            models::CreateGameRequest,
            models::UpdateGameRequest,
            models::Game,
            // Rounds
            models::CreateRoundRequest,
            models::UpdateRoundRequest,
            models::Round,
            models::RoundListResponse,
            // Turns
            models::CreateTurnRequest,
            models::UpdateTurnRequest,
            models::Turn,
            models::TurnListResponse,
            models::ArtifactUploadResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Games", description = "Game management"),
        (name = "Rounds", description = "Ordered rounds within a game"),
        (name = "Turns", description = "Player turns and their archives")
    )
)]
pub struct ApiDoc;
