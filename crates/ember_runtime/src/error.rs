//! Runtime errors

use ember_game::GameError;
use ember_gamestate::CheckpointError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid run config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid level manifest: {0}")]
    Level(#[from] serde_json::Error),

    #[error("No level given; pass a level path or set EMBERFALL_LEVEL")]
    NoLevel,

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
