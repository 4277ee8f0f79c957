//! Game repository server library.
//!
//! Records games, their ordered rounds and per-player turns, and stores one
//! zip archive per turn on the local filesystem. The round sequencer keeps
//! round orders gap-free; the cleanup service reclaims archives whose turn
//! was deleted.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
