//! Error types for the game session

use ember_gamestate::CheckpointError;
use ember_physics::PhysicsError;
use thiserror::Error;

/// Game session errors
///
/// Only broken preconditions end up here. Gameplay conditions such as
/// blocked damage or unknown trigger targets are outcomes, not errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Physics backend failure (bad configuration or a stale handle)
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Checkpoint encoding failure
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Invalid session configuration
    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    /// The operation needs a loaded level
    #[error("No level loaded")]
    NoLevel,

    /// Checkpoint data belongs to another level
    #[error("Checkpoint is for level '{found}', but '{expected}' is loaded")]
    LevelMismatch { expected: String, found: String },
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, GameError>;
