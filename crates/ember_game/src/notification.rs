//! Notifications for the UI, audio and persistence collaborators

use ember_core::EntityId;
use ember_gamestate::CheckpointData;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Something the outside world may want to present or store.
///
/// The session queues these in order; collaborators drain them once per
/// frame with [`GameSession::drain_notifications`](crate::GameSession::drain_notifications).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    LevelLoaded {
        level: String,
        chapter: String,
    },
    Toast {
        message: String,
        duration: f32,
    },
    Sound {
        sound: String,
    },
    Dialogue {
        dialogue: String,
    },
    ChapterChanged {
        chapter: String,
    },
    TriggerFired {
        trigger: String,
    },
    QuestStarted {
        quest: String,
    },
    ObjectiveProgressed {
        quest: String,
        objective: String,
        progress: u32,
        target: u32,
    },
    ObjectiveCompleted {
        quest: String,
        objective: String,
    },
    QuestCompleted {
        quest: String,
    },
    AbilityUnlocked {
        ability: String,
    },
    AchievementUnlocked {
        achievement: String,
    },
    /// The persistence collaborator stores `data`
    CheckpointReached {
        checkpoint: String,
        data: CheckpointData,
    },
    PlayerHurt {
        damage: f32,
        remaining: f32,
    },
    PlayerDied,
    PlayerRespawned {
        position: Vec2,
    },
    EnemyDefeated {
        enemy: EntityId,
        kind: String,
    },
    BossPhaseChanged {
        enemy: EntityId,
        from: usize,
        to: usize,
    },
}
