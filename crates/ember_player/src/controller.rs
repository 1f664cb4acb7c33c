//! The player controller

use crate::assist::{ComboTracker, JumpAssist, JumpResult};
use crate::config::PlayerConfig;
use crate::input::{InputFrame, InputIntent};
use ember_combat::prelude::*;
use ember_core::{Countdown, Deadline, EntityId};
use ember_physics::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ability ids unlocked through quests and triggers
pub mod abilities {
    /// Enables [`super::PlayerController::parry`]
    pub const PARRY: &str = "parry";
}

/// Upward speed above which the player never counts as grounded.
/// Keeps the probe from re-arming coyote time on the tick of a jump.
const RISING_EPSILON: f32 = 0.5;

/// Horizontal speed below which a grounded player is idle
const IDLE_SPEED: f32 = 0.1;

/// Coarse movement state, mostly for animation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Idle,
    Running,
    Jumping,
    Falling,
    Attacking,
    Hurt,
    Dead,
}

/// Result of an attack request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    /// A hitbox was spawned for the given table slot
    Attacked { slot: usize, hitbox: EntityId },
    /// The attack cooldown is still running
    OnCooldown,
    /// A hitbox for this combo step is still alive
    HitboxActive,
    /// Dead, or the attack table is empty
    Unavailable,
}

/// Result of a parry request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParryResult {
    Opened,
    OnCooldown,
    /// The parry ability has not been unlocked
    Locked,
    Unavailable,
}

/// What happened during [`PlayerController::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTick {
    pub grounded: bool,
    /// A buffered jump fired on landing
    pub buffered_jump: bool,
}

/// Read-only view of the player for rendering and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub state: MovementState,
    pub facing: f32,
    pub grounded: bool,
    pub health: f32,
    pub max_health: f32,
    pub warmth: f32,
    pub max_warmth: f32,
    pub combo_index: u32,
    pub invulnerable: bool,
    pub parrying: bool,
}

/// Player character controller.
///
/// Owns the player's timers and meters; the body itself lives in the
/// [`PhysicsWorld`] and is only reached through its handle.
#[derive(Debug)]
pub struct PlayerController {
    id: EntityId,
    config: PlayerConfig,
    body: BodyRef,
    feet: ColliderHandle,
    probe: GroundProbe,

    state: MovementState,
    facing: f32,
    grounded: bool,
    ground_contact: bool,
    move_requested: bool,

    jump: JumpAssist,
    combo: ComboTracker,
    attack_timer: Countdown,
    hurt_timer: Countdown,
    parry_cooldown: Countdown,
    parry_until: Deadline,

    health: HealthComponent,
    warmth: ResourceMeter,
    abilities: BTreeSet<String>,
}

impl PlayerController {
    /// Create the player body and feet sensor at `position`
    pub fn spawn(
        physics: &mut PhysicsWorld,
        id: EntityId,
        config: PlayerConfig,
        position: Vec2,
    ) -> Result<Self> {
        let matrix = CollisionMatrix::default();
        let half = config.half_extents;

        let body = physics.create_body(
            RigidBodyDesc::character().with_position(position.x, position.y),
            ColliderDesc::new(ColliderShape::cuboid(half.x, half.y))
                .with_material(PhysicsMaterial::frictionless())
                .with_collision_groups(matrix.groups(CollisionLayer::PLAYER))
                .with_user_data(id.to_bits() as u128),
        );
        let feet = physics.attach_collider(
            ColliderDesc::sensor(ColliderShape::cuboid(half.x * 0.8, 0.05))
                .with_offset(0.0, -half.y)
                .with_collision_groups(matrix.groups(CollisionLayer::FEET))
                .with_user_data(id.to_bits() as u128),
            body.body,
        )?;

        log::debug!("Spawned player {} at {:?}", id, position);

        Ok(Self {
            id,
            probe: GroundProbe::below(half, config.ground_probe_depth),
            jump: JumpAssist::new(config.coyote_time, config.jump_buffer_time),
            combo: ComboTracker::new(config.combo_window),
            health: HealthComponent::new(config.max_health)
                .with_invulnerability_on_hit(config.invulnerability_time),
            warmth: ResourceMeter::new(config.max_warmth),
            config,
            body,
            feet,
            state: MovementState::Idle,
            facing: 1.0,
            grounded: false,
            ground_contact: false,
            move_requested: false,
            attack_timer: Countdown::idle(),
            hurt_timer: Countdown::idle(),
            parry_cooldown: Countdown::idle(),
            parry_until: Deadline::none(),
            abilities: BTreeSet::new(),
        })
    }

    // ==================== Tick ====================

    /// Advance the player by one tick.
    ///
    /// Grounded state is recomputed from a physics query, or the feet contact
    /// hint reported since the last update. The hint is consumed here.
    pub fn update(&mut self, dt: f32, physics: &mut PhysicsWorld) -> Result<PlayerTick> {
        let contact_hint = std::mem::take(&mut self.ground_contact);
        let move_requested = std::mem::take(&mut self.move_requested);

        if self.health.is_dead() {
            self.grounded = false;
            self.state = MovementState::Dead;
            return Ok(PlayerTick::default());
        }

        let velocity = physics.body_velocity(self.body.body)?;
        let touching = contact_hint || physics.is_grounded(self.body.body, &self.probe)?;
        self.grounded = touching && velocity.y <= RISING_EPSILON;

        self.jump.observe(self.grounded, dt);
        self.combo.tick(dt);
        self.attack_timer.tick(dt);
        self.hurt_timer.tick(dt);
        self.parry_cooldown.tick(dt);

        let mut tick = PlayerTick {
            grounded: self.grounded,
            buffered_jump: false,
        };

        if self.jump.take_buffered(self.grounded) {
            self.launch(physics)?;
            tick.buffered_jump = true;
            log::trace!("Buffered jump fired on landing");
        }

        if self.grounded && !move_requested && !self.hurt_timer.is_active() {
            let keep = self.config.ground_braking.clamp(0.0, 1.0).powf(dt);
            physics.set_velocity_x(self.body.body, velocity.x * keep)?;
        }

        let velocity = physics.body_velocity(self.body.body)?;
        self.state = self.classify(velocity);
        Ok(tick)
    }

    fn classify(&self, velocity: Vec2) -> MovementState {
        if self.health.is_dead() {
            MovementState::Dead
        } else if self.hurt_timer.is_active() {
            MovementState::Hurt
        } else if self.attack_timer.is_active() {
            MovementState::Attacking
        } else if !self.grounded {
            if velocity.y > 0.0 {
                MovementState::Jumping
            } else {
                MovementState::Falling
            }
        } else if velocity.x.abs() > IDLE_SPEED {
            MovementState::Running
        } else {
            MovementState::Idle
        }
    }

    /// Feet touched ground since the last update
    pub fn mark_ground_contact(&mut self) {
        self.ground_contact = true;
    }

    // ==================== Actions ====================

    /// Apply one tick's intents in order
    pub fn apply_input(
        &mut self,
        frame: &InputFrame,
        now: f32,
        physics: &mut PhysicsWorld,
        hitboxes: &mut HitboxTracker,
    ) -> Result<()> {
        for intent in frame.iter() {
            match intent {
                InputIntent::MoveLeft => self.move_left(physics)?,
                InputIntent::MoveRight => self.move_right(physics)?,
                InputIntent::Jump => {
                    let result = self.jump(physics)?;
                    log::trace!("Jump: {:?}", result);
                }
                InputIntent::Attack => {
                    let result = self.attack(physics, hitboxes)?;
                    log::trace!("Attack: {:?}", result);
                }
                InputIntent::Parry => {
                    let result = self.parry(now);
                    log::trace!("Parry: {:?}", result);
                }
            }
        }
        Ok(())
    }

    pub fn move_left(&mut self, physics: &mut PhysicsWorld) -> Result<()> {
        self.move_horizontal(physics, -1.0)
    }

    pub fn move_right(&mut self, physics: &mut PhysicsWorld) -> Result<()> {
        self.move_horizontal(physics, 1.0)
    }

    fn move_horizontal(&mut self, physics: &mut PhysicsWorld, direction: f32) -> Result<()> {
        if self.health.is_dead() {
            return Ok(());
        }
        self.facing = direction;
        self.move_requested = true;

        let velocity = physics.body_velocity(self.body.body)?;
        if velocity.x * direction >= self.config.max_run_speed {
            return Ok(());
        }

        let control = if self.grounded {
            1.0
        } else {
            self.config.air_control
        };
        let mass = physics.body_mass(self.body.body)?;
        let force = direction * self.config.run_acceleration * control * mass;
        physics.apply_force(self.body.body, Vec2::new(force, 0.0))
    }

    /// Jump now if within coyote time, otherwise buffer the press
    pub fn jump(&mut self, physics: &mut PhysicsWorld) -> Result<JumpResult> {
        if self.health.is_dead() {
            return Ok(JumpResult::Ignored);
        }
        let result = self.jump.press();
        if result == JumpResult::Jumped {
            self.launch(physics)?;
        }
        Ok(result)
    }

    fn launch(&mut self, physics: &mut PhysicsWorld) -> Result<()> {
        self.grounded = false;
        physics.set_velocity_y(self.body.body, self.config.jump_speed)
    }

    /// Attack with the next entry of the combo table
    pub fn attack(
        &mut self,
        physics: &mut PhysicsWorld,
        hitboxes: &mut HitboxTracker,
    ) -> Result<AttackResult> {
        if self.health.is_dead() || self.config.attacks.is_empty() {
            return Ok(AttackResult::Unavailable);
        }
        let Some(slot) = self.combo.next_slot(self.config.attacks.len()) else {
            return Ok(AttackResult::OnCooldown);
        };

        let origin = physics.body_position(self.body.body)?;
        let attack = &self.config.attacks[slot];
        let spawned = hitboxes.spawn(
            physics,
            HitboxSpawn {
                owner: self.id,
                combo_step: slot as u32,
                attack,
                origin,
                facing: self.facing,
                layer: CollisionLayer::PLAYER_ATTACK,
                damage_multiplier: 1.0,
            },
        );

        match spawned {
            Some(hitbox) => {
                self.combo.commit(attack.cooldown, self.config.attacks.len());
                self.attack_timer.start(attack.lifetime);
                log::debug!("Player attack {} ({})", slot, attack.name);
                Ok(AttackResult::Attacked { slot, hitbox })
            }
            None => Ok(AttackResult::HitboxActive),
        }
    }

    /// Open a parry window. Requires the parry ability.
    pub fn parry(&mut self, now: f32) -> ParryResult {
        if self.health.is_dead() {
            return ParryResult::Unavailable;
        }
        if !self.has_ability(abilities::PARRY) {
            return ParryResult::Locked;
        }
        if self.parry_cooldown.is_active() {
            return ParryResult::OnCooldown;
        }
        self.parry_until.extend_to(now + self.config.parry_window);
        self.parry_cooldown.start(self.config.parry_cooldown);
        ParryResult::Opened
    }

    // ==================== Damage ====================

    /// Offer damage to the player at simulation time `now`.
    ///
    /// Parry and invulnerability windows are checked before anything else.
    /// A landed hit knocks the player back and extends invulnerability.
    pub fn take_damage(
        &mut self,
        hit: &DamageInfo,
        now: f32,
        physics: &mut PhysicsWorld,
    ) -> DamageOutcome {
        if self.health.is_dead() {
            return DamageOutcome::Ignored;
        }
        if self.parry_until.is_active(now) {
            log::debug!("Player parried {} damage", hit.amount);
            return DamageOutcome::Blocked;
        }

        let outcome = self.health.apply_damage(hit, now);
        if !outcome.landed() {
            return outcome;
        }

        self.hurt_timer.start(self.config.hurt_time);
        if let Err(err) = physics.apply_impulse(self.body.body, hit.knockback_impulse()) {
            log::warn!("Knockback on player failed: {}", err);
        }

        if outcome.is_kill() {
            self.state = MovementState::Dead;
            self.combo.reset();
            self.jump.reset();
            self.attack_timer.clear();
            log::info!("Player {} died", self.id);
        } else {
            log::debug!(
                "Player took {} damage, {} left",
                hit.amount,
                self.health.current()
            );
        }
        outcome
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        self.health.heal(amount)
    }

    pub fn restore_warmth(&mut self, amount: f32) -> f32 {
        self.warmth.restore(amount)
    }

    pub fn drain_warmth(&mut self, amount: f32) -> f32 {
        self.warmth.drain(amount)
    }

    /// Returns false if the ability was already unlocked
    pub fn unlock_ability(&mut self, ability: impl Into<String>) -> bool {
        let ability = ability.into();
        let added = self.abilities.insert(ability.clone());
        if added {
            log::info!("Unlocked ability '{}'", ability);
        }
        added
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.contains(ability)
    }

    pub fn abilities(&self) -> impl Iterator<Item = &str> {
        self.abilities.iter().map(String::as_str)
    }

    /// Bring the player back at `position` with full meters and a short
    /// invulnerability window
    pub fn respawn(&mut self, position: Vec2, now: f32, physics: &mut PhysicsWorld) -> Result<()> {
        physics.teleport(self.body.body, position)?;

        self.health.revive();
        self.warmth.refill();
        self.health
            .grant_invulnerability(now, self.config.respawn_invulnerability);

        self.jump.reset();
        self.combo.reset();
        self.attack_timer.clear();
        self.hurt_timer.clear();
        self.parry_cooldown.clear();
        self.grounded = false;
        self.ground_contact = false;
        self.move_requested = false;
        self.state = MovementState::Idle;

        log::info!("Player respawned at {:?}", position);
        Ok(())
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn body(&self) -> BodyRef {
        self.body
    }

    pub fn feet_collider(&self) -> ColliderHandle {
        self.feet
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    /// +1 facing right, -1 facing left
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn combo_index(&self) -> u32 {
        self.combo.index()
    }

    pub fn health(&self) -> &HealthComponent {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut HealthComponent {
        &mut self.health
    }

    pub fn warmth(&self) -> &ResourceMeter {
        &self.warmth
    }

    pub fn warmth_mut(&mut self) -> &mut ResourceMeter {
        &mut self.warmth
    }

    pub fn is_invulnerable(&self, now: f32) -> bool {
        self.health.is_invulnerable(now)
    }

    pub fn is_parrying(&self, now: f32) -> bool {
        self.parry_until.is_active(now)
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Result<Vec2> {
        physics.body_position(self.body.body)
    }

    pub fn snapshot(&self, physics: &PhysicsWorld, now: f32) -> Result<PlayerSnapshot> {
        Ok(PlayerSnapshot {
            position: physics.body_position(self.body.body)?,
            velocity: physics.body_velocity(self.body.body)?,
            state: self.state,
            facing: self.facing,
            grounded: self.grounded,
            health: self.health.current(),
            max_health: self.health.max(),
            warmth: self.warmth.current(),
            max_warmth: self.warmth.max(),
            combo_index: self.combo.index(),
            invulnerable: self.health.is_invulnerable(now),
            parrying: self.parry_until.is_active(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        physics: PhysicsWorld,
        hitboxes: HitboxTracker,
        player: PlayerController,
        tick: u32,
    }

    impl Rig {
        fn new() -> Self {
            let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
            physics.create_static_collider(
                ColliderDesc::new(ColliderShape::cuboid(50.0, 0.5))
                    .with_collision_groups(CollisionMatrix::default().groups(CollisionLayer::WORLD)),
            );
            let player = PlayerController::spawn(
                &mut physics,
                EntityId::new(0, 0),
                PlayerConfig::default(),
                Vec2::new(0.0, 1.45),
            )
            .unwrap();
            let mut rig = Self {
                physics,
                hitboxes: HitboxTracker::new(DT),
                player,
                tick: 0,
            };
            rig.run(30);
            rig
        }

        fn now(&self) -> f32 {
            self.tick as f32 * DT
        }

        fn step(&mut self) -> PlayerTick {
            let result = self.player.update(DT, &mut self.physics).unwrap();
            self.physics.step(DT);
            self.hitboxes.tick(&mut self.physics);
            self.physics.drain_collision_events();
            self.tick += 1;
            result
        }

        fn run(&mut self, ticks: u32) {
            for _ in 0..ticks {
                self.step();
            }
        }

        fn velocity(&self) -> Vec2 {
            self.physics.body_velocity(self.player.body().body).unwrap()
        }
    }

    #[test]
    fn test_settles_grounded() {
        let mut rig = Rig::new();
        assert!(rig.step().grounded);
        assert_eq!(rig.player.state(), MovementState::Idle);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut rig = Rig::new();
        rig.step();
        let result = rig.player.jump(&mut rig.physics).unwrap();
        assert_eq!(result, JumpResult::Jumped);
        assert_relative_eq!(rig.velocity().y, 13.0);

        let tick = rig.step();
        assert!(!tick.grounded);
        assert_eq!(rig.player.state(), MovementState::Jumping);
    }

    #[test]
    fn test_no_double_jump_from_coyote_refill() {
        let mut rig = Rig::new();
        rig.step();
        rig.player.jump(&mut rig.physics).unwrap();
        rig.step();
        rig.step();
        assert_eq!(
            rig.player.jump(&mut rig.physics).unwrap(),
            JumpResult::Buffered
        );
    }

    #[test]
    fn test_airborne_jump_is_buffered_then_fires_on_landing() {
        let mut rig = Rig::new();
        rig.step();
        rig.player.jump(&mut rig.physics).unwrap();

        // Rise and fall for a while, then press jump just before touching down
        let mut buffered_fired = false;
        let mut pressed = false;
        for _ in 0..180 {
            let position = rig.player.position(&rig.physics).unwrap();
            if !pressed && rig.velocity().y < 0.0 && position.y < 1.9 {
                assert_eq!(
                    rig.player.jump(&mut rig.physics).unwrap(),
                    JumpResult::Buffered
                );
                pressed = true;
            }
            if rig.step().buffered_jump {
                buffered_fired = true;
                break;
            }
        }
        assert!(pressed);
        assert!(buffered_fired);
        assert!(rig.velocity().y > 10.0);
    }

    #[test]
    fn test_run_speed_is_capped() {
        let mut rig = Rig::new();
        for _ in 0..120 {
            rig.player.move_right(&mut rig.physics).unwrap();
            rig.step();
        }
        let vx = rig.velocity().x;
        assert!(vx > 5.0);
        // One tick of acceleration may overshoot the cap slightly
        assert!(vx <= 7.0 + 60.0 * DT + 0.01);
        assert_eq!(rig.player.facing(), 1.0);
        assert_eq!(rig.player.state(), MovementState::Running);
    }

    #[test]
    fn test_braking_without_input() {
        let mut rig = Rig::new();
        for _ in 0..30 {
            rig.player.move_left(&mut rig.physics).unwrap();
            rig.step();
        }
        assert!(rig.velocity().x < -3.0);
        rig.run(60);
        assert!(rig.velocity().x.abs() < 0.1);
        assert_eq!(rig.player.facing(), -1.0);
    }

    #[test]
    fn test_attack_combo_and_cooldown() {
        let mut rig = Rig::new();
        let first = rig
            .player
            .attack(&mut rig.physics, &mut rig.hitboxes)
            .unwrap();
        assert!(matches!(first, AttackResult::Attacked { slot: 0, .. }));
        assert_eq!(rig.hitboxes.len(), 1);

        let again = rig
            .player
            .attack(&mut rig.physics, &mut rig.hitboxes)
            .unwrap();
        assert_eq!(again, AttackResult::OnCooldown);

        // Wait out the first cooldown, staying inside the combo window
        let cooldown = rig.player.config().attacks[0].cooldown;
        rig.run(ember_core::ticks_for(cooldown, DT) + 1);
        let second = rig
            .player
            .attack(&mut rig.physics, &mut rig.hitboxes)
            .unwrap();
        assert!(matches!(second, AttackResult::Attacked { slot: 1, .. }));
        assert_eq!(rig.player.combo_index(), 2);
    }

    #[test]
    fn test_combo_index_wraps_after_last_attack() {
        let mut rig = Rig::new();
        let table_len = rig.player.config().attacks.len();
        let mut slots = Vec::new();
        for _ in 0..=table_len {
            let result = rig
                .player
                .attack(&mut rig.physics, &mut rig.hitboxes)
                .unwrap();
            match result {
                AttackResult::Attacked { slot, .. } => slots.push(slot),
                other => panic!("attack refused: {:?}", other),
            }
            assert!((rig.player.combo_index() as usize) < table_len);
            let snapshot = rig.player.snapshot(&rig.physics, 0.0).unwrap();
            assert!((snapshot.combo_index as usize) < table_len);
            let cooldown = rig.player.config().attacks[*slots.last().unwrap()].cooldown;
            rig.run(ember_core::ticks_for(cooldown, DT) + 1);
        }
        assert_eq!(slots, vec![0, 1, 2, 0]);
        assert_eq!(rig.player.combo_index(), 1);
    }

    #[test]
    fn test_combo_resets_when_window_expires() {
        let mut rig = Rig::new();
        rig.player
            .attack(&mut rig.physics, &mut rig.hitboxes)
            .unwrap();
        rig.run(60);
        assert_eq!(rig.player.combo_index(), 0);
        let next = rig
            .player
            .attack(&mut rig.physics, &mut rig.hitboxes)
            .unwrap();
        assert!(matches!(next, AttackResult::Attacked { slot: 0, .. }));
    }

    #[test]
    fn test_invulnerability_after_hit() {
        let mut rig = Rig::new();
        let hit = DamageInfo::new(1.0).with_knockback(Vec2::new(-1.0, 0.3), 4.0);

        let first = rig.player.take_damage(&hit, 0.0, &mut rig.physics);
        assert!(matches!(first, DamageOutcome::Applied { .. }));
        assert_relative_eq!(rig.player.health().current(), 4.0);
        assert!(rig.velocity().x < 0.0);

        let blocked = rig.player.take_damage(&hit, 0.1, &mut rig.physics);
        assert_eq!(blocked, DamageOutcome::Blocked);
        assert_relative_eq!(rig.player.health().current(), 4.0);

        let after = rig.player.take_damage(&hit, 0.81, &mut rig.physics);
        assert!(after.landed());
        assert_relative_eq!(rig.player.health().current(), 3.0);
    }

    #[test]
    fn test_parry_requires_ability() {
        let mut rig = Rig::new();
        assert_eq!(rig.player.parry(0.0), ParryResult::Locked);

        assert!(rig.player.unlock_ability(abilities::PARRY));
        assert!(!rig.player.unlock_ability(abilities::PARRY));
        assert_eq!(rig.player.parry(0.0), ParryResult::Opened);
        assert_eq!(rig.player.parry(0.05), ParryResult::OnCooldown);

        let hit = DamageInfo::new(2.0);
        assert_eq!(
            rig.player.take_damage(&hit, 0.1, &mut rig.physics),
            DamageOutcome::Blocked
        );
        assert_relative_eq!(rig.player.health().current(), 5.0);

        // Window over
        assert!(rig.player.take_damage(&hit, 0.25, &mut rig.physics).landed());
    }

    #[test]
    fn test_death_and_respawn() {
        let mut rig = Rig::new();
        let lethal = DamageInfo::new(10.0);
        let outcome = rig.player.take_damage(&lethal, 0.0, &mut rig.physics);
        assert!(outcome.is_kill());
        assert!(rig.player.is_dead());
        assert_eq!(
            rig.player.take_damage(&lethal, 5.0, &mut rig.physics),
            DamageOutcome::Ignored
        );
        assert_eq!(
            rig.player.jump(&mut rig.physics).unwrap(),
            JumpResult::Ignored
        );
        rig.step();
        assert_eq!(rig.player.state(), MovementState::Dead);

        let now = rig.now();
        rig.player
            .respawn(Vec2::new(3.0, 1.45), now, &mut rig.physics)
            .unwrap();
        assert!(!rig.player.is_dead());
        assert_relative_eq!(rig.player.health().current(), 5.0);
        assert!(rig.player.is_invulnerable(now + 1.0));
        let position = rig.player.position(&rig.physics).unwrap();
        assert_relative_eq!(position.x, 3.0);
    }

    #[test]
    fn test_meters_clamp() {
        let mut rig = Rig::new();
        assert_relative_eq!(rig.player.drain_warmth(30.0), 30.0);
        assert_relative_eq!(rig.player.restore_warmth(50.0), 30.0);
        assert_relative_eq!(rig.player.warmth().current(), 100.0);
        assert_relative_eq!(rig.player.heal(3.0), 0.0);
    }

    #[test]
    fn test_apply_input_frame() {
        let mut rig = Rig::new();
        rig.step();
        let frame = InputFrame::new()
            .with(InputIntent::MoveLeft)
            .with(InputIntent::Jump)
            .with(InputIntent::Attack);
        let now = rig.now();
        rig.player
            .apply_input(&frame, now, &mut rig.physics, &mut rig.hitboxes)
            .unwrap();
        assert_eq!(rig.player.facing(), -1.0);
        assert!(rig.velocity().y > 10.0);
        assert_eq!(rig.hitboxes.len(), 1);
    }

    #[test]
    fn test_snapshot() {
        let mut rig = Rig::new();
        rig.step();
        let snapshot = rig.player.snapshot(&rig.physics, rig.now()).unwrap();
        assert!(snapshot.grounded);
        assert_relative_eq!(snapshot.health, 5.0);
        assert_relative_eq!(snapshot.warmth, 100.0);
        assert!(!snapshot.invulnerable);
    }
}
