//! Named enemy kinds

use crate::boss::{BossConfig, BossPhase};
use crate::stats::EnemyStats;
use ember_combat::AttackDef;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A spawnable enemy kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyKind {
    pub stats: EnemyStats,
    /// Present for bosses
    pub boss: Option<BossConfig>,
}

/// Lookup of enemy kinds by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyCatalog {
    kinds: BTreeMap<String, EnemyKind>,
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EnemyCatalog {
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// The built-in roster
    pub fn with_defaults() -> Self {
        let mut catalog = Self::empty();

        catalog.insert(
            "frost_wisp",
            EnemyKind {
                stats: EnemyStats {
                    max_health: 2.0,
                    move_speed: 4.0,
                    detection_radius: 7.0,
                    half_extents: Vec2::new(0.3, 0.3),
                    ..Default::default()
                },
                boss: None,
            },
        );

        catalog.insert(
            "ice_brute",
            EnemyKind {
                stats: EnemyStats {
                    max_health: 6.0,
                    damage: 2.0,
                    move_speed: 2.0,
                    attack_radius: 1.6,
                    attack_cooldown: 1.6,
                    half_extents: Vec2::new(0.6, 0.9),
                    attack: AttackDef::new("smash", 2.0)
                        .with_knockback(9.0)
                        .with_lifetime(0.3)
                        .with_shape(Vec2::new(1.0, 0.0), Vec2::new(0.7, 0.6)),
                    ..Default::default()
                },
                boss: None,
            },
        );

        catalog.insert(
            "frost_warden",
            EnemyKind {
                stats: EnemyStats {
                    max_health: 30.0,
                    damage: 2.0,
                    move_speed: 2.5,
                    detection_radius: 12.0,
                    attack_radius: 2.5,
                    attack_cooldown: 1.2,
                    patrol_distance: 0.0,
                    half_extents: Vec2::new(1.0, 1.5),
                    ..Default::default()
                },
                boss: Some(BossConfig {
                    thresholds: vec![0.66, 0.33],
                    phases: vec![
                        BossPhase {
                            name: "vigil".into(),
                            patterns: vec![
                                AttackDef::new("glacier_sweep", 2.0).with_cooldown(1.4),
                                AttackDef::new("frost_stomp", 2.0)
                                    .with_cooldown(1.6)
                                    .with_shape(Vec2::new(0.0, -1.2), Vec2::new(2.0, 0.4)),
                            ],
                            ..Default::default()
                        },
                        BossPhase {
                            name: "storm".into(),
                            speed_multiplier: 1.3,
                            damage_multiplier: 1.5,
                            patterns: vec![
                                AttackDef::new("glacier_sweep", 2.0).with_cooldown(1.0),
                                AttackDef::new("ice_lance", 2.0)
                                    .with_cooldown(1.2)
                                    .with_shape(Vec2::new(2.0, 0.0), Vec2::new(1.5, 0.3)),
                                AttackDef::new("frost_stomp", 2.0)
                                    .with_cooldown(1.2)
                                    .with_shape(Vec2::new(0.0, -1.2), Vec2::new(2.0, 0.4)),
                            ],
                        },
                        BossPhase {
                            name: "whiteout".into(),
                            speed_multiplier: 1.6,
                            damage_multiplier: 2.0,
                            patterns: vec![
                                AttackDef::new("ice_lance", 2.0)
                                    .with_cooldown(0.8)
                                    .with_shape(Vec2::new(2.0, 0.0), Vec2::new(1.5, 0.3)),
                                AttackDef::new("glacier_sweep", 2.0).with_cooldown(0.8),
                            ],
                        },
                    ],
                }),
            },
        );

        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: EnemyKind) {
        self.kinds.insert(name.into(), kind);
    }

    pub fn get(&self, name: &str) -> Option<&EnemyKind> {
        self.kinds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let catalog = EnemyCatalog::default();
        assert!(catalog.contains("frost_wisp"));
        assert!(catalog.get("ice_brute").unwrap().boss.is_none());
        let warden = catalog.get("frost_warden").unwrap();
        let boss = warden.boss.as_ref().unwrap();
        assert_eq!(boss.phases.len(), boss.thresholds.len() + 1);
        assert!(catalog.get("snow_golem").is_none());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "bat": { "stats": { "max_health": 1.0, "move_speed": 5.0 } }
        }"#;
        let catalog: EnemyCatalog = serde_json::from_str(json).unwrap();
        let bat = catalog.get("bat").unwrap();
        assert_eq!(bat.stats.max_health, 1.0);
        assert_eq!(bat.stats.detection_radius, EnemyStats::default().detection_radius);
        assert!(bat.boss.is_none());
    }
}
