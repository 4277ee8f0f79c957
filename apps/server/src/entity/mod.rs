//! SeaORM entity definitions.

pub mod game;
pub mod metadata;
pub mod round;
pub mod turn;
