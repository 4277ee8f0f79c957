//! Game models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::game;

/// Request body for creating a game.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateGameRequest {
    pub name: String,
}

/// Request body for updating a game. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateGameRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// A game as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<game::Model> for Game {
    fn from(model: game::Model) -> Self {
        Game {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
