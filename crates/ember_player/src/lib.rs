//! Ember Player - the player character controller
//!
//! The controller turns input intents into physics requests and keeps the
//! small timers that make a platformer feel fair:
//!
//! - coyote time: a jump shortly after walking off a ledge still works
//! - jump buffering: a jump pressed shortly before landing fires on landing
//! - attack combos with a chaining window and per-attack cooldowns
//! - invulnerability after a hit and an ability-gated parry window
//!
//! Timers only move when [`PlayerController::update`] is called with the
//! tick delta. Grounded state is queried from the physics world on every
//! update and never carried over from a previous tick.

pub mod assist;
pub mod config;
pub mod controller;
pub mod input;

pub mod prelude {
    pub use crate::assist::{ComboTracker, JumpAssist, JumpResult};
    pub use crate::config::PlayerConfig;
    pub use crate::controller::{
        abilities, AttackResult, MovementState, ParryResult, PlayerController, PlayerSnapshot,
        PlayerTick,
    };
    pub use crate::input::{InputFrame, InputIntent};
}

pub use prelude::*;
