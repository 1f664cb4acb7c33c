//! Ember Core - shared building blocks for the simulation crates
//!
//! Everything in here is deterministic and advanced explicitly by the game
//! loop. There are no wall-clock reads and no background timers: a countdown
//! only moves when somebody calls `tick(dt)` on it.
//!
//! # Contents
//!
//! - [`EntityId`] / [`IdAllocator`]: generational ids owned by a session
//! - [`Countdown`]: a timer that counts down by the tick delta
//! - [`Deadline`]: an absolute end time that can only move forward
//! - [`SimClock`]: tick counter and derived simulation time
//! - [`Aabb`]: axis-aligned boxes for regions and overlap tests
//! - [`Outbox`]: an ordered event queue drained by collaborators

pub mod clock;
pub mod geometry;
pub mod id;
pub mod outbox;
pub mod timer;

pub mod prelude {
    //! Common imports
    pub use crate::clock::{ticks_for, SimClock};
    pub use crate::geometry::Aabb;
    pub use crate::id::{EntityId, IdAllocator};
    pub use crate::outbox::Outbox;
    pub use crate::timer::{Countdown, Deadline};
    pub use glam::Vec2;
}

pub use prelude::*;
