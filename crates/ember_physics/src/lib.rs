//! Ember Physics - Rapier 2D Integration
//!
//! The physics world is the only writer of body transforms. Everything else
//! in the simulation holds opaque handles and asks the world to move things.
//!
//! # Features
//!
//! - Rigid bodies (fixed, dynamic, kinematic) and 2D collider shapes
//! - Sensors for hitboxes, hazards and feet probes
//! - Platformer collision layers and a collision matrix
//! - Grounded checks through an overlap query
//! - Collision events accumulated across substeps and drained in a
//!   deterministic order
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 PhysicsWorld                  │
//! │  ┌─────────────┐ ┌─────────────┐ ┌──────────┐ │
//! │  │ RigidBodySet│ │ ColliderSet │ │ Queries  │ │
//! │  └─────────────┘ └─────────────┘ └──────────┘ │
//! │  ┌──────────────────────────────────────────┐ │
//! │  │ PhysicsPipeline (fixed-step accumulator) │ │
//! │  └──────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────┘
//!          │                         │
//!          ▼                         ▼
//!    BodyRef handles        drain_collision_events()
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ember_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default())?;
//!
//! let player = physics.create_body(
//!     RigidBodyDesc::dynamic().with_position(0.0, 2.0).with_locked_rotation(),
//!     ColliderDesc::new(ColliderShape::cuboid(0.4, 0.9)),
//! );
//!
//! physics.step(1.0 / 60.0);
//! for event in physics.drain_collision_events() {
//!     // route to combat
//! }
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod layers;
pub mod material;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyRef, RigidBodyDesc, RigidBodyHandle, RigidBodyType};
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{CollisionEvent, CollisionEventType};
    pub use crate::layers::{CollisionGroups, CollisionLayer, CollisionMatrix};
    pub use crate::material::PhysicsMaterial;
    pub use crate::query::GroundProbe;
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
