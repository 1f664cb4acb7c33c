//! Enemies and bosses in the world

use crate::boss::{BossAi, BossConfig};
use crate::brain::{AiIntent, AiState, EnemyAi, Perception};
use crate::stats::EnemyStats;
use ember_combat::prelude::*;
use ember_core::{EntityId, Outbox};
use ember_physics::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Something an enemy did that its owner may care about
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyEvent {
    StateChanged {
        enemy: EntityId,
        from: AiState,
        to: AiState,
    },
    Attacked {
        enemy: EntityId,
        attack: String,
    },
    PhaseChanged {
        enemy: EntityId,
        from: usize,
        to: usize,
    },
    Died {
        enemy: EntityId,
    },
}

/// Read-only view of an enemy for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: EntityId,
    pub kind: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub state: AiState,
    pub health: f32,
    pub max_health: f32,
    pub boss_phase: Option<usize>,
}

/// An enemy: body handle, AI, health and, for bosses, phase tracking
#[derive(Debug)]
pub struct Enemy {
    id: EntityId,
    kind: String,
    body: BodyRef,
    stats: EnemyStats,
    basic_attack: AttackDef,
    ai: EnemyAi,
    boss: Option<BossAi>,
    health: HealthComponent,
    spawn_point: Vec2,
    detached: bool,
    events: Outbox<EnemyEvent>,
}

impl Enemy {
    /// Create the enemy body at `position`
    pub fn spawn(
        physics: &mut PhysicsWorld,
        id: EntityId,
        kind: impl Into<String>,
        stats: EnemyStats,
        boss: Option<BossConfig>,
        position: Vec2,
    ) -> Self {
        let kind = kind.into();
        let half = stats.half_extents;
        let body = physics.create_body(
            RigidBodyDesc::character().with_position(position.x, position.y),
            ColliderDesc::new(ColliderShape::cuboid(half.x, half.y))
                .with_material(PhysicsMaterial::frictionless())
                .with_collision_groups(CollisionMatrix::default().groups(CollisionLayer::ENEMY))
                .with_user_data(id.to_bits() as u128),
        );

        log::debug!(
            "Spawned {} {} '{}' at {:?}",
            if boss.is_some() { "boss" } else { "enemy" },
            id,
            kind,
            position
        );

        Self {
            id,
            kind,
            body,
            basic_attack: stats.basic_attack(),
            ai: EnemyAi::new(&stats, position),
            boss: boss.map(BossAi::new),
            health: HealthComponent::new(stats.max_health),
            stats,
            spawn_point: position,
            detached: false,
            events: Outbox::new(),
        }
    }

    /// Think and act for one tick against the player's last known position
    pub fn update(
        &mut self,
        dt: f32,
        player: Option<Vec2>,
        physics: &mut PhysicsWorld,
        hitboxes: &mut HitboxTracker,
    ) -> Result<()> {
        if self.detached {
            return Ok(());
        }

        let position = physics.body_position(self.body.body)?;
        let speed_multiplier = self.boss.as_ref().map_or(1.0, BossAi::speed_multiplier);
        let (intent, change) =
            self.ai
                .think(dt, &Perception { position, player }, speed_multiplier);

        if let Some(change) = change {
            log::trace!("{} {:?} -> {:?}", self.id, change.from, change.to);
            self.events.push(EnemyEvent::StateChanged {
                enemy: self.id,
                from: change.from,
                to: change.to,
            });
        }

        match intent {
            AiIntent::Move { direction, speed } => {
                physics.set_velocity_x(self.body.body, direction * speed)?;
            }
            AiIntent::Hold => {
                physics.set_velocity_x(self.body.body, 0.0)?;
            }
            AiIntent::Attack { facing } => {
                physics.set_velocity_x(self.body.body, 0.0)?;
                self.execute_attack(facing, position, physics, hitboxes);
            }
            AiIntent::None => {}
        }
        Ok(())
    }

    fn execute_attack(
        &mut self,
        facing: f32,
        origin: Vec2,
        physics: &mut PhysicsWorld,
        hitboxes: &mut HitboxTracker,
    ) {
        let (slot, attack, multiplier) = match &self.boss {
            Some(boss) => match boss.peek_pattern() {
                Some((slot, attack)) => (slot, attack.clone(), boss.damage_multiplier()),
                None => (0, self.basic_attack.clone(), boss.damage_multiplier()),
            },
            None => (0, self.basic_attack.clone(), 1.0),
        };

        let spawned = hitboxes.spawn(
            physics,
            HitboxSpawn {
                owner: self.id,
                combo_step: slot as u32,
                attack: &attack,
                origin,
                facing,
                layer: CollisionLayer::ENEMY_ATTACK,
                damage_multiplier: multiplier,
            },
        );
        // A refused spawn leaves the pattern and the cooldown untouched
        if spawned.is_none() {
            return;
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.advance_pattern();
        }
        self.ai.start_cooldown(attack.cooldown);
        self.events.push(EnemyEvent::Attacked {
            enemy: self.id,
            attack: attack.name,
        });
    }

    /// Offer damage to this enemy. Returns `Killed` exactly once; after
    /// that every hit is `Ignored`.
    pub fn receive_hit(
        &mut self,
        hit: &DamageInfo,
        now: f32,
        physics: &mut PhysicsWorld,
    ) -> DamageOutcome {
        if self.detached {
            return DamageOutcome::Ignored;
        }
        let outcome = self.health.apply_damage(hit, now);
        if !outcome.landed() {
            return outcome;
        }

        if let Err(err) = physics.apply_impulse(self.body.body, hit.knockback_impulse()) {
            log::warn!("Knockback on {} failed: {}", self.id, err);
        }

        if outcome.is_kill() {
            if let Some(change) = self.ai.kill() {
                self.events.push(EnemyEvent::StateChanged {
                    enemy: self.id,
                    from: change.from,
                    to: change.to,
                });
            }
            self.events.push(EnemyEvent::Died { enemy: self.id });
            log::info!("Enemy {} '{}' defeated", self.id, self.kind);
        } else if let Some(boss) = self.boss.as_mut() {
            for change in boss.observe_health(self.health.fraction()) {
                log::info!(
                    "Boss {} enters phase {} (below {:.0}% health)",
                    self.id,
                    change.to,
                    change.threshold * 100.0
                );
                self.events.push(EnemyEvent::PhaseChanged {
                    enemy: self.id,
                    from: change.from,
                    to: change.to,
                });
            }
        }
        outcome
    }

    /// Heal without affecting boss phase
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.health.heal(amount)
    }

    /// Remove the body and any live hitboxes from the world
    pub fn detach(&mut self, physics: &mut PhysicsWorld, hitboxes: &mut HitboxTracker) {
        if self.detached {
            return;
        }
        hitboxes.remove_owned_by(physics, self.id);
        physics.remove_body(self.body.body);
        self.detached = true;
    }

    pub fn drain_events(&mut self) -> Vec<EnemyEvent> {
        self.events.drain()
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn body(&self) -> BodyRef {
        self.body
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn state(&self) -> AiState {
        self.ai.state()
    }

    pub fn health(&self) -> &HealthComponent {
        &self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn boss(&self) -> Option<&BossAi> {
        self.boss.as_ref()
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Result<Vec2> {
        physics.body_position(self.body.body)
    }

    pub fn snapshot(&self, physics: &PhysicsWorld) -> Result<EnemySnapshot> {
        Ok(EnemySnapshot {
            id: self.id,
            kind: self.kind.clone(),
            position: physics.body_position(self.body.body)?,
            velocity: physics.body_velocity(self.body.body)?,
            state: self.ai.state(),
            health: self.health.current(),
            max_health: self.health.max(),
            boss_phase: self.boss.as_ref().map(BossAi::phase),
        })
    }
}
