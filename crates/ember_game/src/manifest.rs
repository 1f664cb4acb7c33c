//! Level manifest: the already-parsed level data a session is built from

use ember_ai::StatOverrides;
use ember_combat::HazardDef;
use ember_core::Aabb;
use ember_gamestate::Quest;
use ember_physics::PhysicsMaterial;
use ember_triggers::TriggerDef;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Surface of a platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Stone,
    Ice,
}

impl Surface {
    pub fn material(self) -> PhysicsMaterial {
        match self {
            Self::Stone => PhysicsMaterial::stone(),
            Self::Ice => PhysicsMaterial::ice(),
        }
    }
}

/// Static level geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub region: Aabb,
    #[serde(default)]
    pub surface: Surface,
}

impl PlatformDef {
    pub fn new(region: Aabb) -> Self {
        Self {
            region,
            surface: Surface::Stone,
        }
    }
}

/// An enemy placed in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Name in the enemy catalog
    pub kind: String,
    pub position: Vec2,
    #[serde(default)]
    pub overrides: StatOverrides,
    /// Spawn with boss phases even if the kind has none configured
    #[serde(default)]
    pub boss: bool,
}

impl EnemySpawn {
    pub fn new(kind: impl Into<String>, position: Vec2) -> Self {
        Self {
            kind: kind.into(),
            position,
            overrides: StatOverrides::default(),
            boss: false,
        }
    }
}

/// A respawn point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointDef {
    pub id: String,
    pub position: Vec2,
}

/// Everything needed to build a level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelManifest {
    pub id: String,
    pub chapter: String,
    /// Player spawn. A missing or non-finite spawn falls back to the
    /// configured fallback.
    pub spawn: Option<Vec2>,
    pub platforms: Vec<PlatformDef>,
    pub enemies: Vec<EnemySpawn>,
    pub triggers: Vec<TriggerDef>,
    pub quests: Vec<Quest>,
    pub hazards: Vec<HazardDef>,
    pub checkpoints: Vec<CheckpointDef>,
}

impl LevelManifest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = chapter.into();
        self
    }

    pub fn with_spawn(mut self, spawn: Vec2) -> Self {
        self.spawn = Some(spawn);
        self
    }

    pub fn with_platform(mut self, region: Aabb) -> Self {
        self.platforms.push(PlatformDef::new(region));
        self
    }

    pub fn with_enemy(mut self, spawn: EnemySpawn) -> Self {
        self.enemies.push(spawn);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerDef) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn with_quest(mut self, quest: Quest) -> Self {
        self.quests.push(quest);
        self
    }

    pub fn with_hazard(mut self, hazard: HazardDef) -> Self {
        self.hazards.push(hazard);
        self
    }

    pub fn with_checkpoint(mut self, id: impl Into<String>, position: Vec2) -> Self {
        self.checkpoints.push(CheckpointDef {
            id: id.into(),
            position,
        });
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_triggers::{TriggerAction, TriggerRegion};

    #[test]
    fn test_manifest_from_json() {
        let json = r#"{
            "id": "frozen_hollow",
            "chapter": "chapter_1",
            "platforms": [
                { "region": { "min": [-20.0, -1.0], "max": [20.0, 0.0] } },
                { "region": { "min": [5.0, 2.0], "max": [8.0, 2.5] }, "surface": "ice" }
            ],
            "enemies": [
                { "kind": "frost_wisp", "position": [6.0, 1.0], "overrides": { "max_health": 4.0 } }
            ],
            "triggers": [
                {
                    "id": "intro",
                    "region": { "area": { "min": [0.0, 0.0], "max": [2.0, 3.0] } },
                    "action": { "type": "show_toast", "message": "The cold bites." }
                }
            ],
            "hazards": [
                { "id": "spikes", "region": { "min": [10.0, 0.0], "max": [11.0, 0.5] }, "damage": 1.0 }
            ]
        }"#;
        let manifest = LevelManifest::from_json(json).unwrap();

        assert_eq!(manifest.spawn, None);
        assert_eq!(manifest.platforms[1].surface, Surface::Ice);
        assert_eq!(manifest.enemies[0].overrides.max_health, Some(4.0));
        assert!(!manifest.enemies[0].boss);
        assert!(matches!(manifest.triggers[0].region, TriggerRegion::Area(_)));
        assert_eq!(manifest.triggers[0].action, TriggerAction::toast("The cold bites."));
        assert_eq!(manifest.hazards[0].cooldown, 1.0);
        assert!(manifest.quests.is_empty());
    }
}
