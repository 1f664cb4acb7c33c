//! The game session and its fixed-order tick
//!
//! One tick runs, in order:
//!
//! 1. input intents are applied to the player
//! 2. the player controller updates (ground probe, timers, braking)
//! 3. enemy brains update against the player position
//! 4. the physics world steps
//! 5. drained collision events are resolved into combat
//! 6. triggers are checked against the player position
//! 7. a render snapshot is produced
//!
//! Nothing observes a half-finished tick: notifications raised during a tick
//! are queued and drained by collaborators afterwards.

use crate::builder::{BuildReport, LevelBuilder, LevelSystems};
use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::host::{apply_rewards, capture_checkpoint, targets, CombatHost, SessionHost, Story};
use crate::manifest::LevelManifest;
use crate::notification::Notification;
use crate::snapshot::{AnimationClocks, EnemyView, HitboxView, PlayerView, RenderSnapshot};
use ember_ai::{Enemy, EnemyCatalog, EnemyEvent, StatOverrides};
use ember_combat::{ColliderRole, CombatEvent, CombatResolver, DamageOutcome, HitboxTracker};
use ember_core::{EntityId, IdAllocator, Outbox, SimClock};
use ember_gamestate::{CheckpointData, ObjectiveUpdate, ProgressTracker, QuestSystem};
use ember_physics::PhysicsWorld;
use ember_player::{InputFrame, PlayerController};
use ember_triggers::TriggerSystem;
use glam::Vec2;
use std::collections::BTreeSet;

/// Rounds of target notifications one tick may chain
const MAX_TARGET_ROUNDS: usize = 8;

#[derive(Debug, Clone)]
struct LoadedLevel {
    id: String,
    spawn: Vec2,
}

/// Player state carried from one level into the next
#[derive(Debug, Clone)]
struct CarriedPlayer {
    health: f32,
    max_health: f32,
    warmth: f32,
    abilities: BTreeSet<String>,
}

impl CarriedPlayer {
    fn capture(player: &PlayerController) -> Self {
        Self {
            health: player.health().current(),
            max_health: player.health().max(),
            warmth: player.warmth().current(),
            abilities: player.abilities().map(str::to_string).collect(),
        }
    }

    fn apply(&self, player: &mut PlayerController) {
        player.health_mut().set_max(self.max_health);
        if self.health > 0.0 {
            player.health_mut().set_health(self.health);
        }
        player.warmth_mut().set(self.warmth);
        for ability in &self.abilities {
            player.unlock_ability(ability.clone());
        }
    }
}

/// A running game: one loaded level and everything simulated in it
pub struct GameSession {
    config: GameConfig,
    catalog: EnemyCatalog,
    physics: PhysicsWorld,
    ids: IdAllocator,
    clock: SimClock,
    frame_clock: FrameClock,
    pending_presses: InputFrame,
    resolver: CombatResolver,
    hitboxes: HitboxTracker,
    player: Option<PlayerController>,
    enemies: Vec<Enemy>,
    triggers: TriggerSystem,
    story: Story,
    notifications: Outbox<Notification>,
    animations: AnimationClocks,
    level: Option<LoadedLevel>,
    carried: Option<CarriedPlayer>,
    respawn_pending: bool,
    paused: bool,
}

impl GameSession {
    /// Create a session with the default enemy catalog and no level loaded
    pub fn new(config: GameConfig) -> Result<Self> {
        config.frame.validate()?;
        let physics = PhysicsWorld::new(config.physics_for_ticks())?;
        let fixed_dt = config.frame.fixed_dt;

        log::info!("Game session created (fixed dt {:.4}s)", fixed_dt);

        Ok(Self {
            catalog: EnemyCatalog::with_defaults(),
            physics,
            ids: IdAllocator::new(),
            clock: SimClock::new(fixed_dt),
            frame_clock: FrameClock::new(config.frame.clone()),
            pending_presses: InputFrame::new(),
            resolver: CombatResolver::new(),
            hitboxes: HitboxTracker::new(fixed_dt),
            player: None,
            enemies: Vec::new(),
            triggers: TriggerSystem::new(),
            story: Story::default(),
            notifications: Outbox::new(),
            animations: AnimationClocks::default(),
            level: None,
            carried: None,
            respawn_pending: false,
            paused: false,
            config,
        })
    }

    pub fn with_catalog(mut self, catalog: EnemyCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    // ==================== Levels ====================

    /// Build `manifest` into the world, replacing any loaded level
    pub fn load_level(&mut self, manifest: &LevelManifest) -> Result<BuildReport> {
        self.teardown_level();

        let built = {
            let mut builder = LevelBuilder::new(
                &mut self.physics,
                &mut self.ids,
                &mut self.resolver,
                &self.catalog,
            );
            builder.build(
                manifest,
                self.config.fallback_spawn,
                LevelSystems {
                    triggers: &mut self.triggers,
                    quests: &mut self.story.quests,
                    checkpoints: &mut self.story.checkpoints,
                },
            )
        };
        self.enemies = built.enemies;

        let mut player = PlayerController::spawn(
            &mut self.physics,
            self.ids.allocate(),
            self.config.player.clone(),
            built.spawn,
        )?;
        self.resolver
            .register(player.body().collider, ColliderRole::Player);
        self.resolver
            .register(player.feet_collider(), ColliderRole::PlayerFeet);
        if let Some(carried) = self.carried.take() {
            carried.apply(&mut player);
        }
        self.player = Some(player);

        if !manifest.chapter.is_empty() {
            self.story.chapter = manifest.chapter.clone();
        }
        self.level = Some(LoadedLevel {
            id: manifest.id.clone(),
            spawn: built.spawn,
        });
        self.frame_clock.reset();

        self.notifications.push(Notification::LevelLoaded {
            level: manifest.id.clone(),
            chapter: self.story.chapter.clone(),
        });
        // Quests that start active announce themselves
        self.story.flush_quest_events(&mut self.notifications);

        log::info!("Level '{}' loaded", manifest.id);
        Ok(built.report)
    }

    /// Destroy everything the loaded level created. Abilities, health and
    /// warmth carry over to the next level; quests and triggers do not.
    pub fn teardown_level(&mut self) {
        let Some(level) = self.level.take() else {
            return;
        };

        self.triggers.teardown();
        self.hitboxes.forget_all();
        self.resolver.clear();
        self.enemies.clear();
        if let Some(player) = self.player.take() {
            self.carried = Some(CarriedPlayer::capture(&player));
        }
        self.physics.clear();
        self.story.quests.clear();
        self.story.checkpoints.reset_level(&level.id);
        self.story.clear_pending();
        self.animations.clear();
        self.ids.reset();
        self.pending_presses.clear();
        self.respawn_pending = false;

        log::info!("Level '{}' torn down", level.id);
    }

    // ==================== Frames ====================

    /// Run as many fixed ticks as `real_dt` covers. Presses in `input` are
    /// queued until a tick runs and apply to that tick only; held movement
    /// applies to every tick.
    pub fn frame(&mut self, real_dt: f32, input: &InputFrame) -> Result<u32> {
        if self.paused || self.level.is_none() {
            return Ok(0);
        }

        for intent in input.iter().filter(|intent| !intent.is_held()) {
            if !self.pending_presses.contains(intent) {
                self.pending_presses.push(intent);
            }
        }

        let ticks = self.frame_clock.advance(real_dt);
        if ticks == 0 {
            return Ok(0);
        }

        let held: InputFrame = input.iter().filter(|intent| intent.is_held()).collect();
        let first: InputFrame = held
            .iter()
            .chain(std::mem::take(&mut self.pending_presses).iter())
            .collect();

        for index in 0..ticks {
            let frame = if index == 0 { &first } else { &held };
            self.tick(frame)?;
        }
        Ok(ticks)
    }

    /// Advance the simulation by exactly one fixed tick
    pub fn tick(&mut self, input: &InputFrame) -> Result<RenderSnapshot> {
        if self.level.is_none() {
            return Err(GameError::NoLevel);
        }
        if self.paused {
            return self.snapshot();
        }

        let dt = self.clock.fixed_dt();
        self.clock.advance();
        let now = self.clock.now();

        if self.respawn_pending {
            self.respawn_player(now)?;
        }

        // 1. Input
        if let Some(player) = self.player.as_mut() {
            player.apply_input(input, now, &mut self.physics, &mut self.hitboxes)?;
        }

        // 2. Player
        if let Some(player) = self.player.as_mut() {
            let tick = player.update(dt, &mut self.physics)?;
            log::trace!("Player tick: {:?}", tick);
        }

        // 3. Enemies
        let target = match &self.player {
            Some(player) if !player.is_dead() => Some(player.position(&self.physics)?),
            _ => None,
        };
        for enemy in &mut self.enemies {
            enemy.update(dt, target, &mut self.physics, &mut self.hitboxes)?;
        }

        // 4. Physics
        self.physics.step(dt);

        // 5. Collisions
        let events = self.physics.drain_collision_events();
        let mut host = CombatHost {
            now,
            physics: &mut self.physics,
            player: self.player.as_mut(),
            enemies: &mut self.enemies,
            defeated: Vec::new(),
        };
        let combat = self
            .resolver
            .resolve(dt, &events, &mut self.hitboxes, &mut host);
        let defeated = host.defeated;

        self.handle_combat(&combat);
        self.handle_defeated(defeated);
        self.drain_enemy_events();
        for expired in self.hitboxes.tick(&mut self.physics) {
            log::trace!("Hitbox {} expired", expired);
        }

        // 6. Triggers
        self.triggers.tick(dt);
        self.check_triggers()?;
        self.process_targets();
        self.spawn_pending();
        self.story.progress.add_play_time(dt as f64);

        // 7. Snapshot
        self.observe_animations(dt);
        self.snapshot()
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::debug!("Session paused");
        }
    }

    /// Resume without replaying the time spent paused
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.frame_clock.reset();
            log::debug!("Session resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ==================== Tick steps ====================

    fn respawn_player(&mut self, now: f32) -> Result<()> {
        self.respawn_pending = false;
        let spawn = self
            .story
            .checkpoints
            .spawn()
            .or_else(|| self.level.as_ref().map(|level| level.spawn))
            .unwrap_or(self.config.fallback_spawn);

        if let Some(player) = self.player.as_mut() {
            player.respawn(spawn, now, &mut self.physics)?;
            self.notifications
                .push(Notification::PlayerRespawned { position: spawn });
        }
        Ok(())
    }

    fn handle_combat(&mut self, events: &[CombatEvent]) {
        for event in events {
            match event {
                CombatEvent::PlayerHit { outcome, .. } => match *outcome {
                    DamageOutcome::Applied { dealt, remaining } => {
                        self.notifications.push(Notification::PlayerHurt {
                            damage: dealt,
                            remaining,
                        });
                    }
                    DamageOutcome::Killed { dealt } => {
                        self.notifications.push(Notification::PlayerHurt {
                            damage: dealt,
                            remaining: 0.0,
                        });
                        self.notifications.push(Notification::PlayerDied);
                        self.story.progress.add_death();
                        self.respawn_pending = true;
                        log::info!("Player died");
                    }
                    _ => {}
                },
                other => log::trace!("Combat: {:?}", other),
            }
        }
    }

    fn handle_defeated(&mut self, defeated: Vec<EntityId>) {
        for id in defeated {
            let Some(enemy) = self.enemies.iter_mut().find(|e| e.id() == id) else {
                continue;
            };
            let kind = enemy.kind().to_string();
            enemy.detach(&mut self.physics, &mut self.hitboxes);
            self.resolver.unregister_enemy(id);

            self.story.progress.add_kill(&kind);
            self.story.pending_targets.push(targets::defeated(&kind));
            self.notifications
                .push(Notification::EnemyDefeated { enemy: id, kind });
        }
    }

    fn drain_enemy_events(&mut self) {
        for enemy in &mut self.enemies {
            for event in enemy.drain_events() {
                match event {
                    EnemyEvent::PhaseChanged { enemy, from, to } => {
                        self.notifications
                            .push(Notification::BossPhaseChanged { enemy, from, to });
                    }
                    other => log::trace!("Enemy: {:?}", other),
                }
            }
        }

        let animations = &mut self.animations;
        self.enemies.retain(|enemy| {
            if enemy.is_detached() {
                animations.forget_enemy(enemy.id());
                return false;
            }
            true
        });
    }

    /// Split the session into the trigger system and the host its actions see
    fn trigger_parts(&mut self) -> (&mut TriggerSystem, SessionHost<'_>) {
        let Self {
            triggers,
            story,
            player,
            catalog,
            notifications,
            level,
            config,
            ..
        } = self;
        let (level, level_spawn) = match level.as_ref() {
            Some(level) => (level.id.as_str(), level.spawn),
            None => ("", config.fallback_spawn),
        };
        let host = SessionHost {
            level,
            level_spawn,
            story,
            player: player.as_mut(),
            catalog,
            notifications,
        };
        (triggers, host)
    }

    fn check_triggers(&mut self) -> Result<()> {
        let position = match &self.player {
            Some(player) if !player.is_dead() => player.position(&self.physics)?,
            _ => return Ok(()),
        };

        let (triggers, mut host) = self.trigger_parts();
        let fired = triggers.check(position, &mut host);
        for trigger in fired {
            self.notifications
                .push(Notification::TriggerFired { trigger });
        }
        Ok(())
    }

    /// Flush quest events and notify target triggers until nothing new is
    /// queued
    fn process_targets(&mut self) {
        for _ in 0..MAX_TARGET_ROUNDS {
            self.story.flush_quest_events(&mut self.notifications);
            let pending = std::mem::take(&mut self.story.pending_targets);
            if pending.is_empty() {
                return;
            }
            for target in pending {
                let (triggers, mut host) = self.trigger_parts();
                let fired = triggers.notify_target(&target, &mut host);
                for trigger in fired {
                    self.notifications
                        .push(Notification::TriggerFired { trigger });
                }
            }
        }

        let dropped = self.story.pending_targets.len();
        if dropped > 0 {
            log::warn!("Dropping {} chained trigger targets", dropped);
            self.story.pending_targets.clear();
        }
        self.story.flush_quest_events(&mut self.notifications);
    }

    fn spawn_pending(&mut self) {
        let pending = std::mem::take(&mut self.story.pending_spawns);
        if pending.is_empty() {
            return;
        }

        let mut builder = LevelBuilder::new(
            &mut self.physics,
            &mut self.ids,
            &mut self.resolver,
            &self.catalog,
        );
        for (kind, position) in pending {
            if let Some(enemy) = builder.enemy(&kind, position, &StatOverrides::default(), false) {
                log::debug!("Spawned '{}' at {:?}", kind, position);
                self.enemies.push(enemy);
            }
        }
    }

    fn observe_animations(&mut self, dt: f32) {
        if let Some(player) = &self.player {
            self.animations.observe_player(player.state(), dt);
        }
        for enemy in &self.enemies {
            self.animations
                .observe_enemy(enemy.id(), enemy.state(), dt);
        }
    }

    // ==================== Story ====================

    /// Progress an objective from outside the trigger system, e.g. a pickup
    pub fn update_objective(&mut self, quest: &str, objective: &str, amount: u32) -> ObjectiveUpdate {
        let update = self.story.quests.update_objective(quest, objective, amount);
        match &update {
            ObjectiveUpdate::QuestCompleted { rewards } => {
                apply_rewards(
                    rewards,
                    self.player.as_mut(),
                    &mut self.story.progress,
                    &mut self.notifications,
                );
            }
            ObjectiveUpdate::Unknown => {
                log::warn!("Unknown objective '{}' in quest '{}'", objective, quest);
            }
            _ => {}
        }
        self.process_targets();
        update
    }

    /// Notify target triggers listening for `target`. Returns the ids of the
    /// triggers that fired.
    pub fn notify_target(&mut self, target: &str) -> Vec<String> {
        let (triggers, mut host) = self.trigger_parts();
        let fired = triggers.notify_target(target, &mut host);
        for trigger in &fired {
            self.notifications.push(Notification::TriggerFired {
                trigger: trigger.clone(),
            });
        }
        self.process_targets();
        fired
    }

    /// Capture the persisted state at the current checkpoint (or the level
    /// spawn) and record it as the latest
    pub fn checkpoint(&mut self) -> Result<CheckpointData> {
        let level = self.level.as_ref().ok_or(GameError::NoLevel)?;
        let spawn = self.story.checkpoints.spawn().unwrap_or(level.spawn);
        let data = capture_checkpoint(
            &level.id,
            self.story.checkpoints.current_id(),
            spawn,
            self.player.as_ref(),
            &self.story,
        );
        self.story.checkpoints.record(data.clone());
        Ok(data)
    }

    /// Restore checkpoint data taken in the loaded level
    pub fn restore(&mut self, data: &CheckpointData) -> Result<()> {
        let level = self.level.as_ref().ok_or(GameError::NoLevel)?;
        if level.id != data.level {
            return Err(GameError::LevelMismatch {
                expected: level.id.clone(),
                found: data.level.clone(),
            });
        }

        if !data.chapter.is_empty() {
            self.story.chapter = data.chapter.clone();
        }
        self.story.progress.restore_flags(data.flags.clone());
        self.story.quests.restore_progress(&data.quests);
        if let Some(checkpoint) = &data.checkpoint {
            self.story.checkpoints.activate(checkpoint);
        }
        self.story.quests.drain_events();

        let now = self.clock.now();
        if let Some(player) = self.player.as_mut() {
            player.respawn(data.spawn, now, &mut self.physics)?;
            CarriedPlayer {
                health: data.health,
                max_health: data.max_health,
                warmth: data.warmth,
                abilities: data.abilities.clone(),
            }
            .apply(player);
        }
        self.respawn_pending = false;
        self.hitboxes.clear(&mut self.physics);

        log::info!("Restored checkpoint in level '{}'", data.level);
        Ok(())
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    // ==================== Views ====================

    /// Build a render snapshot of the current state
    pub fn snapshot(&self) -> Result<RenderSnapshot> {
        let now = self.clock.now();

        let player = match &self.player {
            Some(player) => Some(PlayerView {
                player: player.snapshot(&self.physics, now)?,
                animation_time: self.animations.player(),
            }),
            None => None,
        };

        let mut enemies = Vec::with_capacity(self.enemies.len());
        for enemy in self.enemies.iter().filter(|e| !e.is_detached()) {
            enemies.push(EnemyView {
                enemy: enemy.snapshot(&self.physics)?,
                animation_time: self.animations.enemy(enemy.id()),
            });
        }

        let mut hitboxes = Vec::with_capacity(self.hitboxes.len());
        for hitbox in self.hitboxes.iter() {
            hitboxes.push(HitboxView {
                id: hitbox.id,
                owner: hitbox.owner,
                position: self.physics.body_position(hitbox.body.body)?,
                remaining_ticks: hitbox.remaining_ticks,
            });
        }

        Ok(RenderSnapshot {
            tick: self.clock.tick(),
            time: now,
            alpha: self.frame_clock.alpha(),
            paused: self.paused,
            level: self.level.as_ref().map(|level| level.id.clone()),
            player,
            enemies,
            hitboxes,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &EnemyCatalog {
        &self.catalog
    }

    pub fn level_id(&self) -> Option<&str> {
        self.level.as_ref().map(|level| level.id.as_str())
    }

    pub fn chapter(&self) -> &str {
        &self.story.chapter
    }

    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick()
    }

    pub fn player(&self) -> Option<&PlayerController> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerController> {
        self.player.as_mut()
    }

    pub fn player_position(&self) -> Result<Option<Vec2>> {
        match &self.player {
            Some(player) => Ok(Some(player.position(&self.physics)?)),
            None => Ok(None),
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn quests(&self) -> &QuestSystem {
        &self.story.quests
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.story.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressTracker {
        &mut self.story.progress
    }

    pub fn triggers(&self) -> &TriggerSystem {
        &self.triggers
    }

    pub fn checkpoints(&self) -> &ember_gamestate::CheckpointManager {
        &self.story.checkpoints
    }

    pub fn hitboxes(&self) -> &HitboxTracker {
        &self.hitboxes
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Whether the player died and respawns on the next tick
    pub fn is_respawn_pending(&self) -> bool {
        self.respawn_pending
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("level", &self.level_id())
            .field("tick", &self.clock.tick())
            .field("enemies", &self.enemies.len())
            .field("paused", &self.paused)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Aabb;

    fn floor() -> Aabb {
        Aabb::new(Vec2::new(-30.0, -1.0), Vec2::new(30.0, 0.0))
    }

    fn session() -> GameSession {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        session
            .load_level(
                &LevelManifest::new("test_level")
                    .with_spawn(Vec2::new(0.0, 1.0))
                    .with_platform(floor()),
            )
            .unwrap();
        session
    }

    #[test]
    fn test_tick_requires_level() {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        assert!(matches!(
            session.tick(&InputFrame::new()),
            Err(GameError::NoLevel)
        ));
        assert_eq!(session.frame(1.0 / 60.0, &InputFrame::new()).unwrap(), 0);
    }

    #[test]
    fn test_invalid_frame_config() {
        let mut config = GameConfig::default();
        config.frame.fixed_dt = 0.0;
        assert!(matches!(
            GameSession::new(config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut session = session();
        let snapshot = session.tick(&InputFrame::new()).unwrap();
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.level.as_deref(), Some("test_level"));
        assert!(snapshot.player.is_some());
        assert_eq!(session.tick_count(), 1);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = session();
        session.pause();
        assert_eq!(session.frame(0.1, &InputFrame::new()).unwrap(), 0);
        let snapshot = session.tick(&InputFrame::new()).unwrap();
        assert!(snapshot.paused);
        assert_eq!(session.tick_count(), 0);

        session.resume();
        assert_eq!(session.frame(1.0 / 60.0, &InputFrame::new()).unwrap(), 1);
    }

    #[test]
    fn test_level_loaded_notification() {
        let mut session = session();
        let notifications = session.drain_notifications();
        assert!(matches!(
            notifications.first(),
            Some(Notification::LevelLoaded { level, .. }) if level == "test_level"
        ));
        assert!(session.drain_notifications().is_empty());
    }
}
