//! Ember Triggers - world triggers tied to narrative progression
//!
//! A trigger pairs a region (a box the player walks into, or a named target
//! notified by the game) with a condition over world state and an action.
//! Actions never touch game types directly: they call a [`TriggerHost`]
//! capability implemented by the session.
//!
//! # Example
//!
//! ```ignore
//! use ember_triggers::prelude::*;
//!
//! let mut triggers = TriggerSystem::new();
//! triggers.add(TriggerDef::area("cave_mouth", cave, TriggerAction::toast("It's cold in here")));
//! let fired = triggers.check(player_pos, &mut host);
//! ```

pub mod action;
pub mod condition;
pub mod host;
pub mod system;
pub mod trigger;

pub mod prelude {
    pub use crate::action::TriggerAction;
    pub use crate::condition::TriggerCondition;
    pub use crate::host::{TriggerHost, WorldState};
    pub use crate::system::TriggerSystem;
    pub use crate::trigger::{Trigger, TriggerDef, TriggerRegion};
}

pub use prelude::*;
