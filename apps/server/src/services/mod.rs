//! Business logic services.

pub mod artifacts;
pub mod cleanup;
pub mod rounds;

pub use artifacts::{ArtifactFile, ArtifactStore};
pub use cleanup::{reclaim_orphans, start_cleanup_task, CleanupConfig};
