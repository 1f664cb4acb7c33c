//! Enemy tuning

use ember_combat::AttackDef;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-enemy combat and movement stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub max_health: f32,
    /// Damage dealt by the basic attack
    pub damage: f32,
    /// Chase speed
    pub move_speed: f32,
    /// Patrol speed
    pub patrol_speed: f32,
    /// How far from the spawn point a patrol goes in each direction
    pub patrol_distance: f32,
    /// Start chasing below this distance to the player
    pub detection_radius: f32,
    /// Start attacking below this distance to the player
    pub attack_radius: f32,
    /// Time between basic attacks
    pub attack_cooldown: f32,
    /// Body half-extents
    pub half_extents: Vec2,
    /// Basic attack shape and knockback. `damage` and `attack_cooldown`
    /// override the matching fields.
    pub attack: AttackDef,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            max_health: 3.0,
            damage: 1.0,
            move_speed: 3.0,
            patrol_speed: 1.5,
            patrol_distance: 3.0,
            detection_radius: 6.0,
            attack_radius: 1.2,
            attack_cooldown: 1.0,
            half_extents: Vec2::new(0.4, 0.6),
            attack: AttackDef::new("claw", 1.0)
                .with_knockback(5.0)
                .with_lifetime(0.2),
        }
    }
}

impl EnemyStats {
    /// The basic attack with this enemy's damage and cooldown applied
    pub fn basic_attack(&self) -> AttackDef {
        AttackDef {
            damage: self.damage,
            cooldown: self.attack_cooldown,
            ..self.attack.clone()
        }
    }

    pub fn with_overrides(mut self, overrides: &StatOverrides) -> Self {
        overrides.apply(&mut self);
        self
    }
}

/// Optional per-spawn stat changes from level data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatOverrides {
    pub max_health: Option<f32>,
    pub damage: Option<f32>,
    pub move_speed: Option<f32>,
    pub patrol_distance: Option<f32>,
    pub detection_radius: Option<f32>,
    pub attack_radius: Option<f32>,
    pub attack_cooldown: Option<f32>,
}

impl StatOverrides {
    pub fn apply(&self, stats: &mut EnemyStats) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field {
                    stats.$field = value.max(0.0);
                })*
            };
        }
        set!(
            max_health,
            damage,
            move_speed,
            patrol_distance,
            detection_radius,
            attack_radius,
            attack_cooldown
        );
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_only_set_fields() {
        let overrides = StatOverrides {
            max_health: Some(10.0),
            damage: Some(-2.0),
            ..Default::default()
        };
        let stats = EnemyStats::default().with_overrides(&overrides);
        assert_eq!(stats.max_health, 10.0);
        assert_eq!(stats.damage, 0.0);
        assert_eq!(stats.move_speed, EnemyStats::default().move_speed);
    }

    #[test]
    fn test_basic_attack_uses_stats() {
        let stats = EnemyStats {
            damage: 2.5,
            attack_cooldown: 0.7,
            ..Default::default()
        };
        let attack = stats.basic_attack();
        assert_eq!(attack.damage, 2.5);
        assert_eq!(attack.cooldown, 0.7);
        assert_eq!(attack.name, "claw");
    }
}
