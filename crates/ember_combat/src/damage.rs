//! Damage payloads and outcomes

use ember_core::EntityId;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Types of damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DamageType {
    /// Blows and claws
    #[default]
    Physical,
    /// Freezing hazards and frost attacks
    Frost,
    /// Fire
    Fire,
}

/// Information about a damage instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Damage amount
    pub amount: f32,
    /// Type of damage
    pub damage_type: DamageType,
    /// Entity that caused the damage (if any)
    pub source: Option<EntityId>,
    /// Unit direction the target is pushed in
    pub knockback_direction: Vec2,
    /// Knockback impulse magnitude
    pub knockback_force: f32,
}

impl DamageInfo {
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            damage_type: DamageType::Physical,
            source: None,
            knockback_direction: Vec2::ZERO,
            knockback_force: 0.0,
        }
    }

    /// Set the damage type
    pub fn with_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    /// Set the source entity
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set knockback. The direction is normalized; a zero direction means no
    /// knockback.
    pub fn with_knockback(mut self, direction: Vec2, force: f32) -> Self {
        self.knockback_direction = direction.normalize_or_zero();
        self.knockback_force = force.max(0.0);
        self
    }

    /// Scale the amount (boss phase multipliers)
    pub fn scaled(mut self, multiplier: f32) -> Self {
        self.amount *= multiplier.max(0.0);
        self
    }

    /// Knockback impulse to apply to the target.
    ///
    /// The same formula is used for players and enemies: direction times
    /// force, no hidden per-target multiplier.
    pub fn knockback_impulse(&self) -> Vec2 {
        self.knockback_direction * self.knockback_force
    }
}

/// What happened when damage was offered to a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Health was reduced; the target survived
    Applied { dealt: f32, remaining: f32 },
    /// Health reached zero with this hit
    Killed { dealt: f32 },
    /// An invulnerability or parry window absorbed the hit, nothing changed
    Blocked,
    /// The target was already dead or unknown
    Ignored,
}

impl DamageOutcome {
    /// Whether health changed
    pub fn landed(&self) -> bool {
        matches!(self, Self::Applied { .. } | Self::Killed { .. })
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockback_impulse() {
        let hit = DamageInfo::new(1.0).with_knockback(Vec2::new(3.0, 0.0), 5.0);
        assert_eq!(hit.knockback_impulse(), Vec2::new(5.0, 0.0));

        let none = DamageInfo::new(1.0).with_knockback(Vec2::ZERO, 5.0);
        assert_eq!(none.knockback_impulse(), Vec2::ZERO);
    }

    #[test]
    fn test_scaled() {
        let hit = DamageInfo::new(2.0).scaled(1.5);
        assert_eq!(hit.amount, 3.0);
    }

    #[test]
    fn test_outcome_flags() {
        assert!(DamageOutcome::Applied { dealt: 1.0, remaining: 2.0 }.landed());
        assert!(DamageOutcome::Killed { dealt: 1.0 }.is_kill());
        assert!(!DamageOutcome::Blocked.landed());
        assert!(!DamageOutcome::Ignored.landed());
    }
}
