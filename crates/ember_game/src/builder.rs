//! Level building with graceful degradation
//!
//! Bad level data never aborts a build: an invalid platform, an unknown
//! enemy kind, a malformed trigger or hazard is skipped with a warning, and
//! a missing spawn point falls back to a configured position.

use crate::manifest::{LevelManifest, PlatformDef};
use ember_ai::{BossConfig, Enemy, EnemyCatalog, StatOverrides};
use ember_combat::{ColliderRole, CombatResolver, HazardDef};
use ember_core::{EntityId, IdAllocator};
use ember_gamestate::{Checkpoint, CheckpointManager, QuestSystem};
use ember_physics::prelude::*;
use ember_triggers::TriggerSystem;
use glam::Vec2;

/// What a build produced and what it had to skip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub platforms: usize,
    pub enemies: usize,
    pub hazards: usize,
    pub triggers: usize,
    pub quests: usize,
    pub checkpoints: usize,
    /// Entries dropped because of bad data
    pub skipped: usize,
    /// The manifest had no usable spawn point
    pub fallback_spawn: bool,
}

/// Result of building a level
#[derive(Debug)]
pub struct BuiltLevel {
    pub spawn: Vec2,
    pub enemies: Vec<Enemy>,
    pub report: BuildReport,
}

/// Narrative systems a level registers into
pub struct LevelSystems<'a> {
    pub triggers: &'a mut TriggerSystem,
    pub quests: &'a mut QuestSystem,
    pub checkpoints: &'a mut CheckpointManager,
}

/// Creates level content in the physics world and registers collider roles
pub struct LevelBuilder<'a> {
    physics: &'a mut PhysicsWorld,
    ids: &'a mut IdAllocator,
    resolver: &'a mut CombatResolver,
    catalog: &'a EnemyCatalog,
    matrix: CollisionMatrix,
}

impl<'a> LevelBuilder<'a> {
    pub fn new(
        physics: &'a mut PhysicsWorld,
        ids: &'a mut IdAllocator,
        resolver: &'a mut CombatResolver,
        catalog: &'a EnemyCatalog,
    ) -> Self {
        Self {
            physics,
            ids,
            resolver,
            catalog,
            matrix: CollisionMatrix::default(),
        }
    }

    /// Build every part of `manifest`
    pub fn build(
        &mut self,
        manifest: &LevelManifest,
        fallback_spawn: Vec2,
        systems: LevelSystems<'_>,
    ) -> BuiltLevel {
        let mut report = BuildReport::default();

        let spawn = match manifest.spawn {
            Some(spawn) if spawn.is_finite() => spawn,
            Some(spawn) => {
                log::warn!(
                    "Level '{}' has an invalid spawn {:?}, using {:?}",
                    manifest.id,
                    spawn,
                    fallback_spawn
                );
                report.fallback_spawn = true;
                fallback_spawn
            }
            None => {
                log::warn!(
                    "Level '{}' has no spawn point, using {:?}",
                    manifest.id,
                    fallback_spawn
                );
                report.fallback_spawn = true;
                fallback_spawn
            }
        };

        for platform in &manifest.platforms {
            match self.platform(platform) {
                Some(_) => report.platforms += 1,
                None => report.skipped += 1,
            }
        }

        let mut enemies = Vec::with_capacity(manifest.enemies.len());
        for spawn in &manifest.enemies {
            match self.enemy(&spawn.kind, spawn.position, &spawn.overrides, spawn.boss) {
                Some(enemy) => enemies.push(enemy),
                None => report.skipped += 1,
            }
        }
        report.enemies = enemies.len();

        for hazard in &manifest.hazards {
            match self.hazard(hazard.clone()) {
                Some(_) => report.hazards += 1,
                None => report.skipped += 1,
            }
        }

        report.triggers = systems.triggers.load(manifest.triggers.iter().cloned());
        report.quests = systems.quests.load(manifest.quests.iter().cloned());
        report.skipped += manifest.triggers.len() - report.triggers;
        report.skipped += manifest.quests.len() - report.quests;

        for def in &manifest.checkpoints {
            if def.id.is_empty() || !def.position.is_finite() {
                log::warn!("Skipping invalid checkpoint '{}'", def.id);
                report.skipped += 1;
                continue;
            }
            systems
                .checkpoints
                .register(Checkpoint::new(def.id.clone(), manifest.id.clone(), def.position));
            report.checkpoints += 1;
        }

        log::info!(
            "Built level '{}': {} platforms, {} enemies, {} hazards, {} triggers, {} quests ({} skipped)",
            manifest.id,
            report.platforms,
            report.enemies,
            report.hazards,
            report.triggers,
            report.quests,
            report.skipped
        );

        BuiltLevel {
            spawn,
            enemies,
            report,
        }
    }

    /// Create a static platform and register it as ground
    pub fn platform(&mut self, def: &PlatformDef) -> Option<ColliderHandle> {
        if !def.region.is_valid() {
            log::warn!("Skipping platform with invalid region {:?}", def.region);
            return None;
        }
        let center = def.region.center();
        let half = def.region.half_extents();
        let collider = self.physics.create_static_collider(
            ColliderDesc::new(ColliderShape::cuboid(half.x, half.y))
                .with_offset(center.x, center.y)
                .with_material(def.surface.material())
                .with_collision_groups(self.matrix.groups(CollisionLayer::WORLD)),
        );
        self.resolver.register(collider, ColliderRole::Ground);
        Some(collider)
    }

    /// Spawn an enemy of a catalog kind. Unknown kinds are skipped.
    pub fn enemy(
        &mut self,
        kind: &str,
        position: Vec2,
        overrides: &StatOverrides,
        boss: bool,
    ) -> Option<Enemy> {
        let Some(entry) = self.catalog.get(kind) else {
            log::warn!("Skipping enemy of unknown kind '{}'", kind);
            return None;
        };
        if !position.is_finite() {
            log::warn!("Skipping enemy '{}' at invalid position {:?}", kind, position);
            return None;
        }

        let stats = entry.stats.clone().with_overrides(overrides);
        let boss_config = match (&entry.boss, boss) {
            (Some(config), _) => Some(config.clone()),
            (None, true) => {
                log::warn!("Enemy kind '{}' has no boss phases, using a single phase", kind);
                Some(BossConfig::default())
            }
            (None, false) => None,
        };

        let id = self.ids.allocate();
        let enemy = Enemy::spawn(self.physics, id, kind, stats, boss_config, position);
        self.resolver
            .register(enemy.body().collider, ColliderRole::Enemy(id));
        Some(enemy)
    }

    /// Create a hazard sensor
    pub fn hazard(&mut self, def: HazardDef) -> Option<EntityId> {
        self.resolver
            .hazards_mut()
            .spawn(self.physics, self.ids, def)
    }
}
