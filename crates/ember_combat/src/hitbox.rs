//! Ephemeral attack hitboxes

use crate::attack::AttackDef;
use crate::damage::DamageInfo;
use ember_core::{ticks_for, EntityId, IdAllocator};
use ember_physics::prelude::*;
use glam::Vec2;

/// An attack sensor living for a fixed number of ticks
#[derive(Debug, Clone)]
pub struct AttackHitbox {
    /// Hitbox id
    pub id: EntityId,
    /// Attacker
    pub owner: EntityId,
    /// Combo step that spawned it
    pub combo_step: u32,
    /// Sensor body
    pub body: BodyRef,
    /// Damage payload delivered on hit
    pub damage: DamageInfo,
    /// Ticks left before the hitbox is destroyed
    pub remaining_ticks: u32,
    /// Targets already struck by this hitbox
    hit_targets: Vec<EntityId>,
}

impl AttackHitbox {
    /// Record a hit on `target`. Returns false if it was already hit.
    pub fn register_hit(&mut self, target: EntityId) -> bool {
        if self.hit_targets.contains(&target) {
            false
        } else {
            self.hit_targets.push(target);
            true
        }
    }

    pub fn has_hit(&self, target: EntityId) -> bool {
        self.hit_targets.contains(&target)
    }
}

/// Parameters for spawning a hitbox
#[derive(Debug, Clone, Copy)]
pub struct HitboxSpawn<'a> {
    pub owner: EntityId,
    pub combo_step: u32,
    pub attack: &'a AttackDef,
    /// Attacker position
    pub origin: Vec2,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    /// `PLAYER_ATTACK` or `ENEMY_ATTACK`
    pub layer: CollisionLayer,
    /// Scales the attack damage
    pub damage_multiplier: f32,
}

/// Owns every live hitbox and destroys each one when its lifetime runs out,
/// regardless of whether it hit anything.
#[derive(Debug)]
pub struct HitboxTracker {
    fixed_dt: f32,
    matrix: CollisionMatrix,
    ids: IdAllocator,
    hitboxes: Vec<AttackHitbox>,
}

impl HitboxTracker {
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            matrix: CollisionMatrix::default(),
            ids: IdAllocator::new(),
            hitboxes: Vec::new(),
        }
    }

    /// Spawn a hitbox. Returns `None` if the owner already has a live hitbox
    /// for the same combo step.
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, spawn: HitboxSpawn<'_>) -> Option<EntityId> {
        if self.has_active(spawn.owner, spawn.combo_step) {
            log::debug!(
                "Hitbox for {} step {} still active, not spawning another",
                spawn.owner,
                spawn.combo_step
            );
            return None;
        }

        let id = self.ids.allocate();
        let attack = spawn.attack;
        let center = spawn.origin + attack.facing_offset(spawn.facing);

        let body = physics.create_body(
            RigidBodyDesc::kinematic().with_position(center.x, center.y),
            ColliderDesc::sensor(ColliderShape::cuboid(
                attack.half_extents.x,
                attack.half_extents.y,
            ))
            .with_collision_groups(self.matrix.groups(spawn.layer))
            .with_user_data(id.to_bits() as u128),
        );

        let damage = DamageInfo::new(attack.damage)
            .scaled(spawn.damage_multiplier)
            .with_source(spawn.owner)
            .with_knockback(
                attack.knockback_direction(spawn.facing),
                attack.knockback_force,
            );

        let remaining_ticks = ticks_for(attack.lifetime, self.fixed_dt);
        log::debug!(
            "Spawned hitbox {} ({}) for {} step {}, {} ticks",
            id,
            attack.name,
            spawn.owner,
            spawn.combo_step,
            remaining_ticks
        );

        self.hitboxes.push(AttackHitbox {
            id,
            owner: spawn.owner,
            combo_step: spawn.combo_step,
            body,
            damage,
            remaining_ticks,
            hit_targets: Vec::new(),
        });
        Some(id)
    }

    /// Count every hitbox down by one tick and destroy the expired ones.
    /// Returns the ids that were destroyed.
    pub fn tick(&mut self, physics: &mut PhysicsWorld) -> Vec<EntityId> {
        let mut expired = Vec::new();
        self.hitboxes.retain_mut(|hitbox| {
            hitbox.remaining_ticks = hitbox.remaining_ticks.saturating_sub(1);
            if hitbox.remaining_ticks == 0 {
                physics.remove_body(hitbox.body.body);
                expired.push(hitbox.id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Destroy every hitbox owned by `owner` (owner died or despawned)
    pub fn remove_owned_by(&mut self, physics: &mut PhysicsWorld, owner: EntityId) {
        self.hitboxes.retain(|hitbox| {
            if hitbox.owner == owner {
                physics.remove_body(hitbox.body.body);
                false
            } else {
                true
            }
        });
    }

    /// Destroy everything (level teardown)
    pub fn clear(&mut self, physics: &mut PhysicsWorld) {
        for hitbox in self.hitboxes.drain(..) {
            physics.remove_body(hitbox.body.body);
        }
        self.ids.reset();
    }

    /// Forget every hitbox without touching physics (the world was cleared)
    pub fn forget_all(&mut self) {
        self.hitboxes.clear();
        self.ids.reset();
    }

    /// Whether `owner` has a live hitbox for `combo_step`
    pub fn has_active(&self, owner: EntityId, combo_step: u32) -> bool {
        self.hitboxes
            .iter()
            .any(|h| h.owner == owner && h.combo_step == combo_step)
    }

    /// Look up the hitbox using `collider`
    pub fn by_collider_mut(&mut self, collider: ColliderHandle) -> Option<&mut AttackHitbox> {
        self.hitboxes.iter_mut().find(|h| h.body.collider == collider)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackHitbox> {
        self.hitboxes.iter()
    }

    pub fn len(&self) -> usize {
        self.hitboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hitboxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (PhysicsWorld, HitboxTracker) {
        (
            PhysicsWorld::new(PhysicsConfig::default()).unwrap(),
            HitboxTracker::new(DT),
        )
    }

    fn spawn<'a>(owner: EntityId, step: u32, attack: &'a AttackDef) -> HitboxSpawn<'a> {
        HitboxSpawn {
            owner,
            combo_step: step,
            attack,
            origin: Vec2::ZERO,
            facing: 1.0,
            layer: CollisionLayer::PLAYER_ATTACK,
            damage_multiplier: 1.0,
        }
    }

    #[test]
    fn test_one_hitbox_per_owner_and_step() {
        let (mut physics, mut hitboxes) = setup();
        let attack = AttackDef::default();
        let owner = EntityId::new(0, 0);

        assert!(hitboxes.spawn(&mut physics, spawn(owner, 0, &attack)).is_some());
        assert!(hitboxes.spawn(&mut physics, spawn(owner, 0, &attack)).is_none());
        assert!(hitboxes.spawn(&mut physics, spawn(owner, 1, &attack)).is_some());
        assert!(hitboxes
            .spawn(&mut physics, spawn(EntityId::new(1, 0), 0, &attack))
            .is_some());
        assert_eq!(hitboxes.len(), 3);
        assert_eq!(physics.body_count(), 3);
    }

    #[test]
    fn test_expires_after_lifetime_without_hits() {
        let (mut physics, mut hitboxes) = setup();
        let attack = AttackDef::default().with_lifetime(0.2);
        let owner = EntityId::new(0, 0);
        hitboxes.spawn(&mut physics, spawn(owner, 0, &attack));

        for _ in 0..11 {
            assert!(hitboxes.tick(&mut physics).is_empty());
        }
        assert_eq!(hitboxes.tick(&mut physics).len(), 1);
        assert!(hitboxes.is_empty());
        assert_eq!(physics.body_count(), 0);
        assert!(!hitboxes.has_active(owner, 0));
    }

    #[test]
    fn test_register_hit_once_per_target() {
        let (mut physics, mut hitboxes) = setup();
        let attack = AttackDef::default();
        let id = hitboxes
            .spawn(&mut physics, spawn(EntityId::new(0, 0), 0, &attack))
            .unwrap();
        let collider = hitboxes.iter().find(|h| h.id == id).unwrap().body.collider;

        let target = EntityId::new(9, 0);
        let hitbox = hitboxes.by_collider_mut(collider).unwrap();
        assert!(hitbox.register_hit(target));
        assert!(!hitbox.register_hit(target));
        assert!(hitbox.has_hit(target));
    }

    #[test]
    fn test_damage_payload() {
        let (mut physics, mut hitboxes) = setup();
        let attack = AttackDef::new("test", 2.0).with_knockback(5.0);
        let mut request = spawn(EntityId::new(0, 0), 0, &attack);
        request.damage_multiplier = 1.5;
        request.facing = -1.0;
        hitboxes.spawn(&mut physics, request);

        let hitbox = hitboxes.iter().next().unwrap();
        assert_eq!(hitbox.damage.amount, 3.0);
        assert!(hitbox.damage.knockback_impulse().x < 0.0);
        assert_eq!(hitbox.damage.source, Some(EntityId::new(0, 0)));
    }

    #[test]
    fn test_clear() {
        let (mut physics, mut hitboxes) = setup();
        let attack = AttackDef::default();
        hitboxes.spawn(&mut physics, spawn(EntityId::new(0, 0), 0, &attack));
        hitboxes.clear(&mut physics);
        assert!(hitboxes.is_empty());
        assert_eq!(physics.body_count(), 0);
    }
}
