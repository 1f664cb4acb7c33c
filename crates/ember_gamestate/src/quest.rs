//! Quests and objective tracking
//!
//! A quest is an ordered list of objectives. Only the current objective
//! accepts progress; filling it advances to the next one, and filling the
//! last one completes the quest. Rewards are handed out exactly once.

use ember_core::Outbox;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle of a quest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    #[default]
    Inactive,
    Active,
    Completed,
}

/// What completing a quest grants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestReward {
    UnlockAbility { ability: String },
    SetFlag { flag: String },
    RestoreHealth { amount: f32 },
    RestoreWarmth { amount: f32 },
    UnlockAchievement { achievement: String },
}

/// A single counted goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub target: u32,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub completed: bool,
}

impl Objective {
    pub fn new(id: impl Into<String>, target: u32) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            target: target.max(1),
            progress: 0,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.progress)
    }

    /// Add progress, clamped to the target. Returns true if this call
    /// completed the objective.
    fn advance(&mut self, delta: u32) -> bool {
        if self.completed {
            return false;
        }
        self.progress = self.progress.saturating_add(delta).min(self.target);
        if self.progress >= self.target {
            self.completed = true;
            return true;
        }
        false
    }

    fn fill(&mut self) {
        self.progress = self.target;
        self.completed = true;
    }
}

/// A quest with its live progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub rewards: Vec<QuestReward>,
    #[serde(default)]
    pub status: QuestStatus,
    /// Index of the objective currently accepting progress
    #[serde(default)]
    pub current: usize,
    #[serde(default)]
    pub rewards_applied: bool,
}

impl Quest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            objectives: Vec::new(),
            rewards: Vec::new(),
            status: QuestStatus::Inactive,
            current: 0,
            rewards_applied: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_reward(mut self, reward: QuestReward) -> Self {
        self.rewards.push(reward);
        self
    }

    pub fn current_objective(&self) -> Option<&Objective> {
        match self.status {
            QuestStatus::Completed => None,
            _ => self.objectives.get(self.current),
        }
    }

    pub fn objective(&self, id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    pub fn is_active(&self) -> bool {
        self.status == QuestStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    /// Completed objectives over total objectives
    pub fn fraction_complete(&self) -> f32 {
        if self.objectives.is_empty() {
            return 0.0;
        }
        let done = self.objectives.iter().filter(|o| o.completed).count();
        done as f32 / self.objectives.len() as f32
    }

    /// Mark completed and hand out the rewards, once
    fn finish(&mut self) -> Vec<QuestReward> {
        self.status = QuestStatus::Completed;
        self.current = self.objectives.len();
        if self.rewards_applied {
            return Vec::new();
        }
        self.rewards_applied = true;
        self.rewards.clone()
    }
}

/// Result of an objective update
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveUpdate {
    /// Unknown quest or objective id
    Unknown,
    /// Known, but nothing changed (quest completed, objective not current)
    Ignored,
    Progressed { progress: u32, target: u32 },
    /// The objective completed and the quest moved on to `next`
    ObjectiveCompleted { next: String },
    /// The last objective completed; carries the rewards to apply
    QuestCompleted { rewards: Vec<QuestReward> },
}

impl ObjectiveUpdate {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Quest notifications, drained by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestEvent {
    Started {
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
    Completed {
        quest: String,
    },
}

/// Serializable progress of one quest, for checkpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest: String,
    pub status: QuestStatus,
    pub current: usize,
    pub progress: Vec<u32>,
}

/// Tracks every quest of the running game
#[derive(Debug, Default)]
pub struct QuestSystem {
    quests: Vec<Quest>,
    index: HashMap<String, usize>,
    events: Outbox<QuestEvent>,
}

impl QuestSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a quest. Quests without objectives or with a duplicate id
    /// are skipped with a warning.
    pub fn add(&mut self, mut quest: Quest) -> bool {
        if quest.id.is_empty() || quest.objectives.is_empty() {
            log::warn!("Skipping quest '{}' without objectives", quest.id);
            return false;
        }
        if self.index.contains_key(&quest.id) {
            log::warn!("Skipping duplicate quest '{}'", quest.id);
            return false;
        }
        for objective in &mut quest.objectives {
            objective.target = objective.target.max(1);
            objective.progress = objective.progress.min(objective.target);
        }
        self.index.insert(quest.id.clone(), self.quests.len());
        self.quests.push(quest);
        true
    }

    pub fn load(&mut self, quests: impl IntoIterator<Item = Quest>) -> usize {
        quests.into_iter().filter(|q| self.add(q.clone())).count()
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.index.get(id).map(|&i| &self.quests[i])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Quest> {
        let i = *self.index.get(id)?;
        self.quests.get_mut(i)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn status(&self, id: &str) -> Option<QuestStatus> {
        self.get(id).map(|q| q.status)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.status(id) == Some(QuestStatus::Active)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.status(id) == Some(QuestStatus::Completed)
    }

    /// Activate an inactive quest. Returns false for unknown ids and for
    /// quests already started.
    pub fn start(&mut self, id: &str) -> bool {
        let Some(quest) = self.get_mut(id) else {
            log::warn!("Cannot start unknown quest '{}'", id);
            return false;
        };
        if quest.status != QuestStatus::Inactive {
            return false;
        }
        quest.status = QuestStatus::Active;
        log::info!("Quest '{}' started", id);
        self.events.push(QuestEvent::Started {
            quest: id.to_string(),
        });
        true
    }

    /// Add `delta` to an objective. Progress on an inactive quest starts it.
    pub fn update_objective(&mut self, quest_id: &str, objective_id: &str, delta: u32) -> ObjectiveUpdate {
        let Some(quest) = self.get(quest_id) else {
            log::warn!("Objective update for unknown quest '{}'", quest_id);
            return ObjectiveUpdate::Unknown;
        };
        let Some(slot) = quest.objectives.iter().position(|o| o.id == objective_id) else {
            log::warn!("Unknown objective '{}' in quest '{}'", objective_id, quest_id);
            return ObjectiveUpdate::Unknown;
        };
        if quest.is_completed() || slot != quest.current {
            log::debug!(
                "Ignoring progress on '{}/{}': not the current objective",
                quest_id,
                objective_id
            );
            return ObjectiveUpdate::Ignored;
        }
        if quest.status == QuestStatus::Inactive {
            self.start(quest_id);
        }

        let Some(&index) = self.index.get(quest_id) else {
            return ObjectiveUpdate::Unknown;
        };
        let quest = &mut self.quests[index];
        let objective = &mut quest.objectives[slot];
        let just_completed = objective.advance(delta);
        let (progress, target) = (objective.progress, objective.target);

        if !just_completed {
            self.events.push(QuestEvent::ObjectiveProgressed {
                quest: quest_id.to_string(),
                objective: objective_id.to_string(),
                progress,
                target,
            });
            return ObjectiveUpdate::Progressed { progress, target };
        }

        quest.current += 1;
        let next = quest.objectives.get(quest.current).map(|o| o.id.clone());
        self.events.push(QuestEvent::ObjectiveCompleted {
            quest: quest_id.to_string(),
            objective: objective_id.to_string(),
        });

        match next {
            Some(next) => ObjectiveUpdate::ObjectiveCompleted { next },
            None => {
                let rewards = quest.finish();
                log::info!("Quest '{}' completed", quest_id);
                self.events.push(QuestEvent::Completed {
                    quest: quest_id.to_string(),
                });
                ObjectiveUpdate::QuestCompleted { rewards }
            }
        }
    }

    /// Complete a quest outright, filling every objective. Returns the
    /// rewards the first time, `None` for unknown or already completed
    /// quests.
    pub fn complete(&mut self, id: &str) -> Option<Vec<QuestReward>> {
        let Some(quest) = self.get_mut(id) else {
            log::warn!("Cannot complete unknown quest '{}'", id);
            return None;
        };
        if quest.is_completed() {
            return None;
        }
        quest.objectives.iter_mut().for_each(Objective::fill);
        let rewards = quest.finish();
        log::info!("Quest '{}' completed", id);
        self.events.push(QuestEvent::Completed { quest: id.to_string() });
        Some(rewards)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter().filter(|q| q.is_active())
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<QuestEvent> {
        self.events.drain()
    }

    /// Progress of every quest that has left the inactive state
    pub fn progress(&self) -> Vec<QuestProgress> {
        self.quests
            .iter()
            .filter(|q| q.status != QuestStatus::Inactive)
            .map(|q| QuestProgress {
                quest: q.id.clone(),
                status: q.status,
                current: q.current,
                progress: q.objectives.iter().map(|o| o.progress).collect(),
            })
            .collect()
    }

    /// Restore saved progress. Unknown quests are skipped. Completed quests
    /// are restored with their rewards marked as applied.
    pub fn restore_progress(&mut self, saved: &[QuestProgress]) {
        for entry in saved {
            let Some(quest) = self.get_mut(&entry.quest) else {
                log::warn!("Saved progress for unknown quest '{}' ignored", entry.quest);
                continue;
            };
            quest.status = entry.status;
            quest.current = entry.current.min(quest.objectives.len());
            for (objective, &progress) in quest.objectives.iter_mut().zip(&entry.progress) {
                objective.progress = progress.min(objective.target);
                objective.completed = objective.progress >= objective.target;
            }
            quest.rewards_applied = quest.is_completed();
        }
    }

    /// Return every quest to its initial state
    pub fn reset(&mut self) {
        for quest in &mut self.quests {
            quest.status = QuestStatus::Inactive;
            quest.current = 0;
            quest.rewards_applied = false;
            for objective in &mut quest.objectives {
                objective.progress = 0;
                objective.completed = false;
            }
        }
        self.events.clear();
    }

    pub fn clear(&mut self) {
        self.quests.clear();
        self.index.clear();
        self.events.clear();
    }
}
