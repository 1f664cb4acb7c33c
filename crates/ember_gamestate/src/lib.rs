//! Ember GameState - narrative progress and persisted state
//!
//! # Features
//!
//! - Quest system with ordered objectives and one-time rewards
//! - Progress tracking (flags, achievements, kill/death/play-time stats)
//! - Checkpoint data with JSON and binary encodings
//!
//! # Example
//!
//! ```ignore
//! use ember_gamestate::prelude::*;
//!
//! let mut quests = QuestSystem::new();
//! quests.add(
//!     Quest::new("embers")
//!         .with_objective(Objective::new("gather", 3))
//!         .with_objective(Objective::new("light", 3)),
//! );
//! quests.update_objective("embers", "gather", 3);
//! ```

pub mod checkpoint;
pub mod progress;
pub mod quest;

pub mod prelude {
    pub use crate::checkpoint::{
        Checkpoint, CheckpointData, CheckpointError, CheckpointManager, CHECKPOINT_VERSION,
    };
    pub use crate::progress::{Achievement, ProgressTracker};
    pub use crate::quest::{
        Objective, ObjectiveUpdate, Quest, QuestEvent, QuestProgress, QuestReward, QuestStatus,
        QuestSystem,
    };
}

pub use prelude::*;
