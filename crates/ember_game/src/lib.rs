//! Ember Game - the gameplay session of Emberfall
//!
//! Ties the physics world, the player controller, enemy brains, combat,
//! triggers and quests into one deterministic fixed-step loop.
//!
//! # Features
//!
//! - Level building from an already-parsed manifest, skipping bad entries
//! - A frame clock that turns real frame deltas into bounded fixed ticks
//! - A fixed seven-step tick producing a render snapshot
//! - Notifications for the UI, audio and persistence collaborators
//! - Checkpoint capture and restore
//!
//! # Example
//!
//! ```ignore
//! use ember_game::prelude::*;
//!
//! let mut session = GameSession::new(GameConfig::default())?;
//! session.load_level(&LevelManifest::from_json(&json)?)?;
//!
//! loop {
//!     session.frame(frame_dt, &input)?;
//!     for notification in session.drain_notifications() {
//!         ui.present(notification);
//!     }
//! }
//! ```

pub mod builder;
pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod manifest;
pub mod notification;
pub mod session;
pub mod snapshot;

pub mod prelude {
    pub use crate::builder::{BuildReport, BuiltLevel, LevelBuilder, LevelSystems};
    pub use crate::clock::FrameClock;
    pub use crate::config::{FrameConfig, GameConfig};
    pub use crate::error::{GameError, Result};
    pub use crate::host::{targets, CombatHost, SessionHost, Story};
    pub use crate::manifest::{CheckpointDef, EnemySpawn, LevelManifest, PlatformDef, Surface};
    pub use crate::notification::Notification;
    pub use crate::session::GameSession;
    pub use crate::snapshot::{
        AnimationClocks, EnemyView, HitboxView, PlayerView, RenderSnapshot, StateTimer,
    };
}

pub use prelude::*;
