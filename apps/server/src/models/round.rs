//! Round models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::round;

/// Request body for creating a round. The order is assigned by the server.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRoundRequest {
    pub game_id: i64,
    pub test_class_id: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Request body for updating a round. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRoundRequest {
    #[serde(default)]
    pub test_class_id: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// New position; only the last position of the game is accepted.
    #[serde(default)]
    pub order: Option<i32>,
}

/// A round as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Round {
    pub id: i64,
    pub game_id: i64,
    pub order: i32,
    pub test_class_id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<round::Model> for Round {
    fn from(model: round::Model) -> Self {
        Round {
            id: model.id,
            game_id: model.game_id,
            order: model.order,
            test_class_id: model.test_class_id,
            started_at: model.started_at,
            closed_at: model.closed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Response for round list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundListResponse {
    pub rounds: Vec<Round>,
}
