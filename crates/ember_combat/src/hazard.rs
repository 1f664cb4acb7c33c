//! Static damaging regions

use crate::damage::{DamageInfo, DamageType};
use ember_core::{Aabb, Countdown, EntityId, IdAllocator};
use ember_physics::prelude::*;
use serde::{Deserialize, Serialize};

/// Hazard as described by level data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardDef {
    pub id: String,
    pub region: Aabb,
    pub damage: f32,
    /// Seconds between two damage applications
    #[serde(default = "default_hazard_cooldown")]
    pub cooldown: f32,
    /// Warmth removed per application
    #[serde(default)]
    pub resource_drain: f32,
    #[serde(default)]
    pub damage_type: DamageType,
}

fn default_hazard_cooldown() -> f32 {
    1.0
}

/// A live hazard
#[derive(Debug, Clone)]
pub struct Hazard {
    pub id: EntityId,
    pub def: HazardDef,
    pub collider: ColliderHandle,
    cooldown: Countdown,
    player_inside: bool,
}

impl Hazard {
    /// Produce a damage payload if the hazard's own cooldown allows it, and
    /// restart that cooldown. The player's invulnerability plays no part here.
    pub fn try_strike(&mut self) -> Option<DamageInfo> {
        if self.cooldown.is_active() {
            return None;
        }
        self.cooldown.start(self.def.cooldown);
        Some(
            DamageInfo::new(self.def.damage)
                .with_type(self.def.damage_type)
                .with_source(self.id),
        )
    }

    pub fn is_player_inside(&self) -> bool {
        self.player_inside
    }

    pub fn set_player_inside(&mut self, inside: bool) {
        self.player_inside = inside;
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_active()
    }
}

/// Every hazard of the current level
#[derive(Debug, Default)]
pub struct HazardSet {
    hazards: Vec<Hazard>,
}

impl HazardSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the sensor for a hazard. Invalid regions are skipped with a
    /// warning.
    pub fn spawn(
        &mut self,
        physics: &mut PhysicsWorld,
        ids: &mut IdAllocator,
        def: HazardDef,
    ) -> Option<EntityId> {
        if !def.region.is_valid() {
            log::warn!("Skipping hazard '{}': invalid region {:?}", def.id, def.region);
            return None;
        }

        let id = ids.allocate();
        let center = def.region.center();
        let half = def.region.half_extents();
        let collider = physics.create_static_collider(
            ColliderDesc::sensor(ColliderShape::cuboid(half.x, half.y))
                .with_offset(center.x, center.y)
                .with_collision_groups(CollisionMatrix::default().groups(CollisionLayer::HAZARD))
                .with_user_data(id.to_bits() as u128),
        );

        log::debug!("Hazard '{}' spawned as {}", def.id, id);
        self.hazards.push(Hazard {
            id,
            def,
            collider,
            cooldown: Countdown::idle(),
            player_inside: false,
        });
        Some(id)
    }

    /// Advance every hazard cooldown
    pub fn tick(&mut self, dt: f32) {
        for hazard in &mut self.hazards {
            hazard.cooldown.tick(dt);
        }
    }

    pub fn by_collider_mut(&mut self, collider: ColliderHandle) -> Option<&mut Hazard> {
        self.hazards.iter_mut().find(|h| h.collider == collider)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Hazard> {
        self.hazards.iter_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter()
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    /// Forget every hazard. Colliders go away with the physics world.
    pub fn clear(&mut self) {
        self.hazards.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn def(cooldown: f32) -> HazardDef {
        HazardDef {
            id: "frost_vent".to_string(),
            region: Aabb::new(Vec2::ZERO, Vec2::ONE),
            damage: 1.0,
            cooldown,
            resource_drain: 5.0,
            damage_type: DamageType::Frost,
        }
    }

    #[test]
    fn test_cooldown_gates_strikes() {
        let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
        let mut ids = IdAllocator::new();
        let mut set = HazardSet::new();
        let id = set.spawn(&mut physics, &mut ids, def(0.5)).unwrap();
        let hazard = set.iter_mut().next().unwrap();
        let collider = hazard.collider;

        let hit = hazard.try_strike().unwrap();
        assert_eq!(hit.damage_type, DamageType::Frost);
        assert_eq!(hit.source, Some(id));
        assert!(hazard.try_strike().is_none());

        set.tick(0.25);
        assert!(set.by_collider_mut(collider).unwrap().try_strike().is_none());
        set.tick(0.25);
        assert!(set.by_collider_mut(collider).unwrap().try_strike().is_some());
    }

    #[test]
    fn test_invalid_region_skipped() {
        let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
        let mut ids = IdAllocator::new();
        let mut set = HazardSet::new();
        let mut bad = def(1.0);
        bad.region = Aabb::new(Vec2::ONE, Vec2::ZERO);
        assert!(set.spawn(&mut physics, &mut ids, bad).is_none());
        assert!(set.is_empty());
        assert_eq!(physics.collider_count(), 0);
    }
}
