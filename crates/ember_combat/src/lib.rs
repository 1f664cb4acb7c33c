//! Ember Combat - health, damage and collision-driven hit resolution
//!
//! # Features
//!
//! - Health and resource meters clamped to `[0, max]`
//! - Invulnerability windows whose end time only moves forward
//! - Attack hitboxes with a tick-counted lifetime, at most one per attacker
//!   and combo step, each hitting a target at most once
//! - Hazards with their own damage cooldown and optional resource drain
//! - [`CombatResolver`], which routes drained physics events by collider
//!   role and applies the results through the [`CombatTargets`] trait
//!
//! # Example
//!
//! ```ignore
//! use ember_combat::prelude::*;
//!
//! let mut health = HealthComponent::new(5.0).with_invulnerability_on_hit(0.8);
//! let hit = DamageInfo::new(1.0).with_knockback(Vec2::X, 6.0);
//!
//! assert!(health.apply_damage(&hit, 0.0).landed());
//! assert_eq!(health.apply_damage(&hit, 0.2), DamageOutcome::Blocked);
//! ```

pub mod attack;
pub mod damage;
pub mod hazard;
pub mod health;
pub mod hitbox;
pub mod resolver;

pub mod prelude {
    pub use crate::attack::AttackDef;
    pub use crate::damage::{DamageInfo, DamageOutcome, DamageType};
    pub use crate::hazard::{Hazard, HazardDef, HazardSet};
    pub use crate::health::{HealthComponent, ResourceMeter};
    pub use crate::hitbox::{AttackHitbox, HitboxSpawn, HitboxTracker};
    pub use crate::resolver::{ColliderRole, CombatEvent, CombatResolver, CombatTargets};
}

pub use prelude::*;
