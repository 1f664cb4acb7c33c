//! Attack definitions

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One entry of an attack table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackDef {
    /// Display / animation name
    pub name: String,
    /// Damage dealt on hit
    pub damage: f32,
    /// Knockback impulse magnitude
    pub knockback_force: f32,
    /// Upward component mixed into the knockback direction
    pub knockback_lift: f32,
    /// How long the hitbox exists, in seconds
    pub lifetime: f32,
    /// Hitbox centre relative to the attacker, for an attacker facing +x
    pub offset: Vec2,
    /// Hitbox half-extents
    pub half_extents: Vec2,
    /// Cooldown started by this attack
    pub cooldown: f32,
}

impl Default for AttackDef {
    fn default() -> Self {
        Self {
            name: "strike".to_string(),
            damage: 1.0,
            knockback_force: 4.0,
            knockback_lift: 0.3,
            lifetime: 0.2,
            offset: Vec2::new(0.8, 0.0),
            half_extents: Vec2::new(0.5, 0.4),
            cooldown: 0.25,
        }
    }
}

impl AttackDef {
    pub fn new(name: impl Into<String>, damage: f32) -> Self {
        Self {
            name: name.into(),
            damage,
            ..Default::default()
        }
    }

    pub fn with_knockback(mut self, force: f32) -> Self {
        self.knockback_force = force;
        self
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_shape(mut self, offset: Vec2, half_extents: Vec2) -> Self {
        self.offset = offset;
        self.half_extents = half_extents;
        self
    }

    /// Knockback direction for an attacker facing `facing` (+1 right, -1 left)
    pub fn knockback_direction(&self, facing: f32) -> Vec2 {
        let sign = if facing < 0.0 { -1.0 } else { 1.0 };
        Vec2::new(sign, self.knockback_lift).normalize_or_zero()
    }

    /// Hitbox centre offset, mirrored for the facing direction
    pub fn facing_offset(&self, facing: f32) -> Vec2 {
        let sign = if facing < 0.0 { -1.0 } else { 1.0 };
        Vec2::new(self.offset.x * sign, self.offset.y)
    }

    /// The default three-step player combo
    pub fn player_combo() -> Vec<AttackDef> {
        vec![
            AttackDef::new("slash", 1.0).with_lifetime(0.15).with_cooldown(0.2),
            AttackDef::new("backslash", 1.0).with_lifetime(0.15).with_cooldown(0.2),
            AttackDef::new("ember_thrust", 2.0)
                .with_knockback(8.0)
                .with_lifetime(0.25)
                .with_cooldown(0.45)
                .with_shape(Vec2::new(1.0, 0.0), Vec2::new(0.7, 0.35)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_mirrors_offset() {
        let attack = AttackDef::default();
        assert_eq!(attack.facing_offset(1.0).x, 0.8);
        assert_eq!(attack.facing_offset(-1.0).x, -0.8);
        assert!(attack.knockback_direction(-1.0).x < 0.0);
        assert!(attack.knockback_direction(1.0).y > 0.0);
    }

    #[test]
    fn test_player_combo_lifetimes_in_range() {
        for attack in AttackDef::player_combo() {
            assert!(attack.lifetime >= 0.15 && attack.lifetime <= 0.3);
        }
    }
}
