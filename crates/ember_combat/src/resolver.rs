//! Collision-driven combat resolution

use crate::damage::{DamageInfo, DamageOutcome};
use crate::hazard::{Hazard, HazardSet};
use crate::hitbox::{AttackHitbox, HitboxTracker};
use ember_core::EntityId;
use ember_physics::prelude::*;
use std::collections::HashMap;

/// What a registered collider stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderRole {
    /// The player's body, which is also its hurtbox
    Player,
    /// The player's feet sensor
    PlayerFeet,
    /// An enemy or boss body
    Enemy(EntityId),
    /// Walkable level geometry
    Ground,
}

/// Something that happened while resolving a tick's collisions
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// A hitbox or hazard reached the player (outcome may be `Blocked`)
    PlayerHit {
        source: Option<EntityId>,
        outcome: DamageOutcome,
    },
    /// A player hitbox reached an enemy
    EnemyHit {
        enemy: EntityId,
        outcome: DamageOutcome,
    },
    /// An enemy's health reached zero. Emitted once per enemy.
    EnemyDefeated { enemy: EntityId },
    /// A hazard drained the player's resource
    ResourceDrained { hazard: EntityId, amount: f32 },
    /// The feet sensor touched ground
    Landed,
}

/// Receives the effects of resolved collisions.
///
/// Implemented by whoever owns the player and enemies; the resolver itself
/// never touches health directly.
pub trait CombatTargets {
    /// Offer damage to the player. Invulnerability is checked by the player
    /// before any health change.
    fn strike_player(&mut self, hit: &DamageInfo) -> DamageOutcome;

    /// Offer damage to an enemy. Must return `Killed` at most once per
    /// enemy and `Ignored` for dead or unknown enemies.
    fn strike_enemy(&mut self, enemy: EntityId, hit: &DamageInfo) -> DamageOutcome;

    /// Drain the player's resource meter
    fn drain_player_resource(&mut self, amount: f32);

    /// The player's feet touched ground this tick
    fn player_touched_ground(&mut self);

    /// An enemy just died; detach its body
    fn enemy_defeated(&mut self, enemy: EntityId);
}

/// Routes collision events to combat effects
#[derive(Debug, Default)]
pub struct CombatResolver {
    roles: HashMap<ColliderHandle, ColliderRole>,
    hazards: HazardSet,
}

impl CombatResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the role of a collider
    pub fn register(&mut self, collider: ColliderHandle, role: ColliderRole) {
        self.roles.insert(collider, role);
    }

    /// Forget a collider (body removed)
    pub fn unregister(&mut self, collider: ColliderHandle) {
        self.roles.remove(&collider);
    }

    /// Forget every collider registered for an enemy
    pub fn unregister_enemy(&mut self, enemy: EntityId) {
        self.roles
            .retain(|_, role| *role != ColliderRole::Enemy(enemy));
    }

    pub fn role(&self, collider: ColliderHandle) -> Option<ColliderRole> {
        self.roles.get(&collider).copied()
    }

    pub fn hazards(&self) -> &HazardSet {
        &self.hazards
    }

    pub fn hazards_mut(&mut self) -> &mut HazardSet {
        &mut self.hazards
    }

    /// Forget all roles and hazards (level teardown)
    pub fn clear(&mut self) {
        self.roles.clear();
        self.hazards.clear();
    }

    /// Resolve one tick's drained collision events.
    ///
    /// Hazard cooldowns advance by `dt` first. Started events are routed by
    /// role: hitbox vs hurtbox deals the hitbox payload, hazard vs player
    /// deals hazard damage and drain, feet vs ground reports a landing.
    /// Stopped events end hazard overlaps. Hazards the player is still
    /// standing in strike again whenever their cooldown allows.
    pub fn resolve<T: CombatTargets>(
        &mut self,
        dt: f32,
        events: &[CollisionEvent],
        hitboxes: &mut HitboxTracker,
        targets: &mut T,
    ) -> Vec<CombatEvent> {
        self.hazards.tick(dt);
        let mut out = Vec::new();

        for event in events {
            let pairs = [
                (event.collider1, event.collider2),
                (event.collider2, event.collider1),
            ];

            if event.is_started() {
                for (a, b) in pairs {
                    if let Some(hitbox) = hitboxes.by_collider_mut(a) {
                        Self::strike_with_hitbox(&self.roles, hitbox, b, targets, &mut out);
                        break;
                    }
                    if let Some(hazard) = self.hazards.by_collider_mut(a) {
                        if self.roles.get(&b) == Some(&ColliderRole::Player) {
                            hazard.set_player_inside(true);
                            Self::strike_with_hazard(hazard, targets, &mut out);
                        }
                        break;
                    }
                    if self.roles.get(&a) == Some(&ColliderRole::PlayerFeet)
                        && self.roles.get(&b) == Some(&ColliderRole::Ground)
                    {
                        targets.player_touched_ground();
                        out.push(CombatEvent::Landed);
                        break;
                    }
                }
            } else {
                for (a, b) in pairs {
                    if let Some(hazard) = self.hazards.by_collider_mut(a) {
                        if self.roles.get(&b) == Some(&ColliderRole::Player) {
                            hazard.set_player_inside(false);
                        }
                        break;
                    }
                }
            }
        }

        for hazard in self.hazards.iter_mut() {
            if hazard.is_player_inside() && !hazard.is_cooling_down() {
                Self::strike_with_hazard(hazard, targets, &mut out);
            }
        }

        out
    }

    fn strike_with_hitbox<T: CombatTargets>(
        roles: &HashMap<ColliderHandle, ColliderRole>,
        hitbox: &mut AttackHitbox,
        other: ColliderHandle,
        targets: &mut T,
        out: &mut Vec<CombatEvent>,
    ) {
        match roles.get(&other) {
            Some(ColliderRole::Player) => {
                // There is a single player; its hits are keyed on the null id
                if !hitbox.register_hit(EntityId::null()) {
                    return;
                }
                let outcome = targets.strike_player(&hitbox.damage);
                out.push(CombatEvent::PlayerHit {
                    source: hitbox.damage.source,
                    outcome,
                });
            }
            Some(ColliderRole::Enemy(enemy)) => {
                let enemy = *enemy;
                if hitbox.owner == enemy || !hitbox.register_hit(enemy) {
                    return;
                }
                let outcome = targets.strike_enemy(enemy, &hitbox.damage);
                out.push(CombatEvent::EnemyHit { enemy, outcome });
                if outcome.is_kill() {
                    log::debug!("Enemy {} defeated by {:?}", enemy, hitbox.damage.source);
                    targets.enemy_defeated(enemy);
                    out.push(CombatEvent::EnemyDefeated { enemy });
                }
            }
            _ => {}
        }
    }

    fn strike_with_hazard<T: CombatTargets>(
        hazard: &mut Hazard,
        targets: &mut T,
        out: &mut Vec<CombatEvent>,
    ) {
        let Some(hit) = hazard.try_strike() else {
            return;
        };
        let outcome = targets.strike_player(&hit);
        out.push(CombatEvent::PlayerHit {
            source: hit.source,
            outcome,
        });
        if hazard.def.resource_drain > 0.0 {
            targets.drain_player_resource(hazard.def.resource_drain);
            out.push(CombatEvent::ResourceDrained {
                hazard: hazard.id,
                amount: hazard.def.resource_drain,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::AttackDef;
    use crate::hazard::HazardDef;
    use crate::health::{HealthComponent, ResourceMeter};
    use crate::hitbox::HitboxSpawn;
    use ember_core::{Aabb, IdAllocator};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    struct Targets {
        now: f32,
        player: HealthComponent,
        warmth: ResourceMeter,
        enemy_id: EntityId,
        enemy: HealthComponent,
        grounded: u32,
        defeated: Vec<EntityId>,
    }

    impl Targets {
        fn new(enemy_id: EntityId) -> Self {
            Self {
                now: 0.0,
                player: HealthComponent::new(5.0).with_invulnerability_on_hit(0.8),
                warmth: ResourceMeter::new(100.0),
                enemy_id,
                enemy: HealthComponent::new(2.0),
                grounded: 0,
                defeated: Vec::new(),
            }
        }
    }

    impl CombatTargets for Targets {
        fn strike_player(&mut self, hit: &DamageInfo) -> DamageOutcome {
            self.player.apply_damage(hit, self.now)
        }

        fn strike_enemy(&mut self, enemy: EntityId, hit: &DamageInfo) -> DamageOutcome {
            if enemy != self.enemy_id {
                return DamageOutcome::Ignored;
            }
            self.enemy.apply_damage(hit, self.now)
        }

        fn drain_player_resource(&mut self, amount: f32) {
            self.warmth.drain(amount);
        }

        fn player_touched_ground(&mut self) {
            self.grounded += 1;
        }

        fn enemy_defeated(&mut self, enemy: EntityId) {
            self.defeated.push(enemy);
        }
    }

    struct Arena {
        physics: PhysicsWorld,
        resolver: CombatResolver,
        hitboxes: HitboxTracker,
        ids: IdAllocator,
        matrix: CollisionMatrix,
    }

    impl Arena {
        fn new() -> Self {
            let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
            physics.set_gravity(0.0, 0.0);
            Self {
                physics,
                resolver: CombatResolver::new(),
                hitboxes: HitboxTracker::new(DT),
                ids: IdAllocator::new(),
                matrix: CollisionMatrix::default(),
            }
        }

        fn actor(&mut self, position: Vec2, layer: CollisionLayer, role: ColliderRole) -> BodyRef {
            let body = self.physics.create_body(
                RigidBodyDesc::character().with_position(position.x, position.y),
                ColliderDesc::new(ColliderShape::cuboid(0.4, 0.5))
                    .with_collision_groups(self.matrix.groups(layer)),
            );
            self.resolver.register(body.collider, role);
            body
        }

        fn tick(&mut self, targets: &mut Targets) -> Vec<CombatEvent> {
            self.physics.step(DT);
            let events = self.physics.drain_collision_events();
            let out = self
                .resolver
                .resolve(DT, &events, &mut self.hitboxes, targets);
            self.hitboxes.tick(&mut self.physics);
            targets.now += DT;
            out
        }
    }

    #[test]
    fn test_player_hitbox_damages_enemy_once() {
        let mut arena = Arena::new();
        let player_id = arena.ids.allocate();
        let enemy_id = arena.ids.allocate();
        arena.actor(Vec2::ZERO, CollisionLayer::PLAYER, ColliderRole::Player);
        arena.actor(
            Vec2::new(1.0, 0.0),
            CollisionLayer::ENEMY,
            ColliderRole::Enemy(enemy_id),
        );

        let attack = AttackDef::new("slash", 1.0);
        arena.hitboxes.spawn(
            &mut arena.physics,
            HitboxSpawn {
                owner: player_id,
                combo_step: 0,
                attack: &attack,
                origin: Vec2::ZERO,
                facing: 1.0,
                layer: CollisionLayer::PLAYER_ATTACK,
                damage_multiplier: 1.0,
            },
        );

        let mut targets = Targets::new(enemy_id);
        let mut hits = 0;
        for _ in 0..20 {
            hits += arena
                .tick(&mut targets)
                .iter()
                .filter(|e| matches!(e, CombatEvent::EnemyHit { .. }))
                .count();
        }

        assert_eq!(hits, 1);
        assert_eq!(targets.enemy.current(), 1.0);
        assert_eq!(targets.player.current(), 5.0);
        assert!(arena.hitboxes.is_empty());
    }

    #[test]
    fn test_duplicate_events_hit_once() {
        let mut arena = Arena::new();
        let player_id = arena.ids.allocate();
        let enemy_id = arena.ids.allocate();
        arena.actor(
            Vec2::new(1.0, 0.0),
            CollisionLayer::ENEMY,
            ColliderRole::Enemy(enemy_id),
        );
        let attack = AttackDef::new("slash", 1.0);
        arena.hitboxes.spawn(
            &mut arena.physics,
            HitboxSpawn {
                owner: player_id,
                combo_step: 0,
                attack: &attack,
                origin: Vec2::ZERO,
                facing: 1.0,
                layer: CollisionLayer::PLAYER_ATTACK,
                damage_multiplier: 1.0,
            },
        );

        arena.physics.step(DT);
        let events = arena.physics.drain_collision_events();
        assert!(!events.is_empty());
        let doubled: Vec<_> = events.iter().chain(events.iter()).cloned().collect();

        let mut targets = Targets::new(enemy_id);
        let out = arena
            .resolver
            .resolve(DT, &doubled, &mut arena.hitboxes, &mut targets);
        assert_eq!(
            out.iter()
                .filter(|e| matches!(e, CombatEvent::EnemyHit { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_enemy_death_reported_once() {
        let mut arena = Arena::new();
        let player_id = arena.ids.allocate();
        let enemy_id = arena.ids.allocate();
        arena.actor(
            Vec2::new(1.0, 0.0),
            CollisionLayer::ENEMY,
            ColliderRole::Enemy(enemy_id),
        );

        let heavy = AttackDef::new("thrust", 5.0);
        let mut targets = Targets::new(enemy_id);
        let mut defeats = 0;
        for step in 0..2 {
            arena.hitboxes.spawn(
                &mut arena.physics,
                HitboxSpawn {
                    owner: player_id,
                    combo_step: step,
                    attack: &heavy,
                    origin: Vec2::ZERO,
                    facing: 1.0,
                    layer: CollisionLayer::PLAYER_ATTACK,
                    damage_multiplier: 1.0,
                },
            );
            for _ in 0..15 {
                defeats += arena
                    .tick(&mut targets)
                    .iter()
                    .filter(|e| matches!(e, CombatEvent::EnemyDefeated { .. }))
                    .count();
            }
        }

        assert_eq!(defeats, 1);
        assert_eq!(targets.defeated, vec![enemy_id]);
    }

    #[test]
    fn test_enemy_hitbox_respects_player_iframes() {
        let mut arena = Arena::new();
        let enemy_id = arena.ids.allocate();
        arena.actor(Vec2::ZERO, CollisionLayer::PLAYER, ColliderRole::Player);

        let claw = AttackDef::new("claw", 1.0);
        let mut targets = Targets::new(enemy_id);
        let mut outcomes = Vec::new();
        for step in 0..2 {
            arena.hitboxes.spawn(
                &mut arena.physics,
                HitboxSpawn {
                    owner: enemy_id,
                    combo_step: step,
                    attack: &claw,
                    origin: Vec2::new(-0.8, 0.0),
                    facing: 1.0,
                    layer: CollisionLayer::ENEMY_ATTACK,
                    damage_multiplier: 1.0,
                },
            );
            for event in arena.tick(&mut targets) {
                if let CombatEvent::PlayerHit { outcome, .. } = event {
                    outcomes.push(outcome);
                }
            }
        }

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].landed());
        assert_eq!(outcomes[1], DamageOutcome::Blocked);
        assert_eq!(targets.player.current(), 4.0);
    }

    #[test]
    fn test_hazard_cooldown_and_drain() {
        let mut arena = Arena::new();
        let enemy_id = arena.ids.allocate();
        arena.actor(Vec2::ZERO, CollisionLayer::PLAYER, ColliderRole::Player);
        let mut ids = IdAllocator::new();
        arena.resolver.hazards_mut().spawn(
            &mut arena.physics,
            &mut ids,
            HazardDef {
                id: "brazier".to_string(),
                region: Aabb::from_center(Vec2::ZERO, Vec2::splat(2.0)),
                damage: 1.0,
                cooldown: 1.0,
                resource_drain: 10.0,
                damage_type: Default::default(),
            },
        );

        let mut targets = Targets::new(enemy_id);
        // Player i-frames (0.8s) are shorter than the hazard cooldown (1s),
        // so every strike lands.
        let mut strikes = 0;
        for _ in 0..130 {
            strikes += arena
                .tick(&mut targets)
                .iter()
                .filter(|e| matches!(e, CombatEvent::PlayerHit { .. }))
                .count();
        }

        assert_eq!(strikes, 3);
        assert_eq!(targets.player.current(), 2.0);
        assert_eq!(targets.warmth.current(), 70.0);
    }

    #[test]
    fn test_feet_on_ground_reports_landing() {
        let mut arena = Arena::new();
        let enemy_id = arena.ids.allocate();
        let ground = arena.physics.create_static_collider(
            ColliderDesc::new(ColliderShape::cuboid(5.0, 0.5))
                .with_offset(0.0, -1.0)
                .with_collision_groups(arena.matrix.groups(CollisionLayer::WORLD)),
        );
        arena.resolver.register(ground, ColliderRole::Ground);

        let body = arena.physics.create_rigid_body(
            RigidBodyDesc::character().with_position(0.0, 0.0),
        );
        let feet = arena
            .physics
            .attach_collider(
                ColliderDesc::sensor(ColliderShape::cuboid(0.3, 0.1))
                    .with_offset(0.0, -0.5)
                    .with_collision_groups(arena.matrix.groups(CollisionLayer::FEET)),
                body,
            )
            .unwrap();
        arena.resolver.register(feet, ColliderRole::PlayerFeet);

        let mut targets = Targets::new(enemy_id);
        let out = arena.tick(&mut targets);
        assert!(out.contains(&CombatEvent::Landed));
        assert_eq!(targets.grounded, 1);
    }
}
