//! Session-side implementations of the trigger and combat capabilities

use crate::notification::Notification;
use ember_ai::{Enemy, EnemyCatalog};
use ember_combat::{CombatTargets, DamageInfo, DamageOutcome};
use ember_core::{EntityId, Outbox};
use ember_gamestate::{
    Checkpoint, CheckpointData, CheckpointManager, ObjectiveUpdate, ProgressTracker, QuestReward,
    QuestSystem,
};
use ember_physics::PhysicsWorld;
use ember_player::PlayerController;
use ember_triggers::{TriggerHost, WorldState};
use glam::Vec2;

/// Narrative state of a session: quests, progress, checkpoints, and the
/// follow-ups triggers have queued for the loop
#[derive(Debug, Default)]
pub struct Story {
    pub quests: QuestSystem,
    pub progress: ProgressTracker,
    pub checkpoints: CheckpointManager,
    pub chapter: String,
    /// Enemies requested by trigger actions, spawned by the loop
    pub pending_spawns: Vec<(String, Vec2)>,
    /// Target names to notify target triggers with
    pub pending_targets: Vec<String>,
}

impl Story {
    /// Move quest events into notifications and queue completion targets
    pub fn flush_quest_events(&mut self, notifications: &mut Outbox<Notification>) {
        use ember_gamestate::QuestEvent;

        for event in self.quests.drain_events() {
            let notification = match event {
                QuestEvent::Started { quest } => Notification::QuestStarted { quest },
                QuestEvent::ObjectiveProgressed {
                    quest,
                    objective,
                    progress,
                    target,
                } => Notification::ObjectiveProgressed {
                    quest,
                    objective,
                    progress,
                    target,
                },
                QuestEvent::ObjectiveCompleted { quest, objective } => {
                    Notification::ObjectiveCompleted { quest, objective }
                }
                QuestEvent::Completed { quest } => {
                    self.pending_targets.push(targets::quest_completed(&quest));
                    Notification::QuestCompleted { quest }
                }
            };
            notifications.push(notification);
        }
    }

    pub fn clear_pending(&mut self) {
        self.pending_spawns.clear();
        self.pending_targets.clear();
    }
}

/// Target names the session notifies target triggers with
pub mod targets {
    pub fn defeated(kind: &str) -> String {
        format!("defeated:{}", kind)
    }

    pub fn quest_completed(quest: &str) -> String {
        format!("quest_completed:{}", quest)
    }
}

/// Snapshot the persisted subset of the session
pub fn capture_checkpoint(
    level: &str,
    checkpoint: Option<&str>,
    spawn: Vec2,
    player: Option<&PlayerController>,
    story: &Story,
) -> CheckpointData {
    let mut data = CheckpointData::new(level, story.chapter.clone(), spawn);
    data.checkpoint = checkpoint.map(str::to_string);
    if let Some(player) = player {
        data.health = player.health().current();
        data.max_health = player.health().max();
        data.warmth = player.warmth().current();
        data.abilities = player.abilities().map(str::to_string).collect();
    }
    data.flags = story.progress.flags().clone();
    data.quests = story.quests.progress();
    data.play_time = story.progress.play_time();
    data
}

/// Apply quest rewards to the player and progress
pub fn apply_rewards(
    rewards: &[QuestReward],
    player: Option<&mut PlayerController>,
    progress: &mut ProgressTracker,
    notifications: &mut Outbox<Notification>,
) {
    let mut player = player;
    for reward in rewards {
        match reward {
            QuestReward::UnlockAbility { ability } => {
                if let Some(player) = player.as_deref_mut() {
                    if player.unlock_ability(ability.clone()) {
                        notifications.push(Notification::AbilityUnlocked {
                            ability: ability.clone(),
                        });
                    }
                }
            }
            QuestReward::SetFlag { flag } => progress.set_flag(flag.clone(), true),
            QuestReward::RestoreHealth { amount } => {
                if let Some(player) = player.as_deref_mut() {
                    player.heal(*amount);
                }
            }
            QuestReward::RestoreWarmth { amount } => {
                if let Some(player) = player.as_deref_mut() {
                    player.restore_warmth(*amount);
                }
            }
            QuestReward::UnlockAchievement { achievement } => {
                if progress.unlock_achievement(achievement) {
                    notifications.push(Notification::AchievementUnlocked {
                        achievement: achievement.clone(),
                    });
                }
            }
        }
    }
}

/// The session as seen by trigger actions
pub struct SessionHost<'a> {
    pub level: &'a str,
    pub level_spawn: Vec2,
    pub story: &'a mut Story,
    pub player: Option<&'a mut PlayerController>,
    pub catalog: &'a EnemyCatalog,
    pub notifications: &'a mut Outbox<Notification>,
}

impl SessionHost<'_> {
    fn rewards(&mut self, rewards: &[QuestReward]) {
        apply_rewards(
            rewards,
            self.player.as_deref_mut(),
            &mut self.story.progress,
            self.notifications,
        );
    }
}

impl WorldState for SessionHost<'_> {
    fn has_flag(&self, flag: &str) -> bool {
        self.story.progress.has_flag(flag)
    }

    fn is_quest_active(&self, quest: &str) -> bool {
        self.story.quests.is_active(quest)
    }

    fn is_quest_completed(&self, quest: &str) -> bool {
        self.story.quests.is_completed(quest)
    }

    fn has_ability(&self, ability: &str) -> bool {
        self.player
            .as_deref()
            .is_some_and(|player| player.has_ability(ability))
    }
}

impl TriggerHost for SessionHost<'_> {
    fn show_toast(&mut self, message: &str, duration: f32) {
        self.notifications.push(Notification::Toast {
            message: message.to_string(),
            duration,
        });
    }

    fn play_sound(&mut self, sound: &str) {
        self.notifications.push(Notification::Sound {
            sound: sound.to_string(),
        });
    }

    fn start_quest(&mut self, quest: &str) -> bool {
        if !self.story.quests.contains(quest) {
            return false;
        }
        self.story.quests.start(quest);
        true
    }

    fn update_objective(&mut self, quest: &str, objective: &str, amount: u32) -> bool {
        let update = self.story.quests.update_objective(quest, objective, amount);
        if let ObjectiveUpdate::QuestCompleted { rewards } = &update {
            self.rewards(rewards);
        }
        update.is_known()
    }

    fn complete_quest(&mut self, quest: &str) -> bool {
        if !self.story.quests.contains(quest) {
            return false;
        }
        if let Some(rewards) = self.story.quests.complete(quest) {
            self.rewards(&rewards);
        }
        true
    }

    fn set_flag(&mut self, flag: &str, value: bool) {
        self.story.progress.set_flag(flag, value);
    }

    fn set_checkpoint(&mut self, checkpoint: &str, position: Option<Vec2>) -> bool {
        if let Some(position) = position {
            self.story
                .checkpoints
                .register(Checkpoint::new(checkpoint, self.level, position));
        }
        if !self.story.checkpoints.activate(checkpoint) {
            return false;
        }
        let spawn = self.story.checkpoints.spawn().unwrap_or(self.level_spawn);
        let data = capture_checkpoint(
            self.level,
            Some(checkpoint),
            spawn,
            self.player.as_deref(),
            self.story,
        );
        self.story.checkpoints.record(data.clone());
        self.notifications.push(Notification::CheckpointReached {
            checkpoint: checkpoint.to_string(),
            data,
        });
        true
    }

    fn unlock_ability(&mut self, ability: &str) {
        if let Some(player) = self.player.as_deref_mut() {
            if player.unlock_ability(ability) {
                self.notifications.push(Notification::AbilityUnlocked {
                    ability: ability.to_string(),
                });
            }
        }
    }

    fn spawn_enemy(&mut self, kind: &str, position: Vec2) -> bool {
        if !self.catalog.contains(kind) {
            return false;
        }
        self.story.pending_spawns.push((kind.to_string(), position));
        true
    }

    fn start_dialogue(&mut self, dialogue: &str) -> bool {
        self.notifications.push(Notification::Dialogue {
            dialogue: dialogue.to_string(),
        });
        true
    }

    fn change_chapter(&mut self, chapter: &str) -> bool {
        if chapter.is_empty() {
            return false;
        }
        self.story.chapter = chapter.to_string();
        log::info!("Chapter changed to '{}'", chapter);
        self.notifications.push(Notification::ChapterChanged {
            chapter: chapter.to_string(),
        });
        true
    }
}

/// The session as seen by the combat resolver
pub struct CombatHost<'a> {
    pub now: f32,
    pub physics: &'a mut PhysicsWorld,
    pub player: Option<&'a mut PlayerController>,
    pub enemies: &'a mut [Enemy],
    /// Enemies whose health reached zero during this resolution
    pub defeated: Vec<EntityId>,
}

impl CombatTargets for CombatHost<'_> {
    fn strike_player(&mut self, hit: &DamageInfo) -> DamageOutcome {
        match self.player.as_deref_mut() {
            Some(player) => player.take_damage(hit, self.now, self.physics),
            None => DamageOutcome::Ignored,
        }
    }

    fn strike_enemy(&mut self, enemy: EntityId, hit: &DamageInfo) -> DamageOutcome {
        match self.enemies.iter_mut().find(|e| e.id() == enemy) {
            Some(target) => target.receive_hit(hit, self.now, self.physics),
            None => DamageOutcome::Ignored,
        }
    }

    fn drain_player_resource(&mut self, amount: f32) {
        if let Some(player) = self.player.as_deref_mut() {
            player.drain_warmth(amount);
        }
    }

    fn player_touched_ground(&mut self) {
        if let Some(player) = self.player.as_deref_mut() {
            player.mark_ground_contact();
        }
    }

    fn enemy_defeated(&mut self, enemy: EntityId) {
        self.defeated.push(enemy);
    }
}
