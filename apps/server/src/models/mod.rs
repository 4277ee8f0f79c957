//! API models for the game repository.

pub mod game;
pub mod round;
pub mod turn;

// Re-export commonly used types
pub use game::{CreateGameRequest, Game, UpdateGameRequest};
pub use round::{CreateRoundRequest, Round, RoundListResponse, UpdateRoundRequest};
pub use turn::{
    ArtifactUploadResponse, CreateTurnRequest, Turn, TurnListResponse, UpdateTurnRequest,
};
