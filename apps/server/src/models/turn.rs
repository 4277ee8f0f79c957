//! Turn models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{metadata, turn};

/// Request body for creating a turn.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTurnRequest {
    pub round_id: i64,
    pub player_id: i64,
    #[serde(default)]
    pub scores: Option<String>,
    #[serde(default)]
    pub is_winner: bool,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Request body for recording the result of a turn.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTurnRequest {
    #[serde(default)]
    pub scores: Option<String>,
    #[serde(default)]
    pub is_winner: Option<bool>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// A turn as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Turn {
    pub id: i64,
    pub round_id: i64,
    pub player_id: i64,
    pub scores: Option<String>,
    pub is_winner: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<turn::Model> for Turn {
    fn from(model: turn::Model) -> Self {
        Turn {
            id: model.id,
            round_id: model.round_id,
            player_id: model.player_id,
            scores: model.scores,
            is_winner: model.is_winner,
            started_at: model.started_at,
            closed_at: model.closed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Response for turn list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TurnListResponse {
    pub turns: Vec<Turn>,
}

/// Response after storing a turn's archive.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArtifactUploadResponse {
    pub turn_id: i64,
    /// Archive file name as served on download.
    pub filename: String,
    pub updated_at: DateTime<Utc>,
}

impl ArtifactUploadResponse {
    /// Build the response from the stored catalog row.
    pub fn from_metadata(turn_id: i64, model: &metadata::Model) -> Self {
        let filename = std::path::Path::new(&model.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.zip", turn_id));

        ArtifactUploadResponse {
            turn_id,
            filename,
            updated_at: model.updated_at,
        }
    }
}
