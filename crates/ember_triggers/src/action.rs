//! Trigger actions

use crate::host::TriggerHost;
use glam::Vec2;
use serde::{Deserialize, Serialize};

fn default_toast_duration() -> f32 {
    3.0
}

fn default_amount() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// What a trigger does when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerAction {
    ShowToast {
        message: String,
        #[serde(default = "default_toast_duration")]
        duration: f32,
    },
    PlaySound {
        sound: String,
    },
    StartQuest {
        quest: String,
    },
    UpdateObjective {
        quest: String,
        objective: String,
        #[serde(default = "default_amount")]
        amount: u32,
    },
    CompleteQuest {
        quest: String,
    },
    SetFlag {
        flag: String,
        #[serde(default = "default_true")]
        value: bool,
    },
    SetCheckpoint {
        checkpoint: String,
        #[serde(default)]
        position: Option<Vec2>,
    },
    UnlockAbility {
        ability: String,
    },
    SpawnEnemy {
        kind: String,
        position: Vec2,
    },
    StartDialogue {
        dialogue: String,
    },
    ChangeChapter {
        chapter: String,
    },
    /// Several actions in order
    Sequence {
        actions: Vec<TriggerAction>,
    },
}

impl TriggerAction {
    pub fn toast(message: impl Into<String>) -> Self {
        Self::ShowToast {
            message: message.into(),
            duration: default_toast_duration(),
        }
    }

    pub fn set_flag(flag: impl Into<String>) -> Self {
        Self::SetFlag {
            flag: flag.into(),
            value: true,
        }
    }

    /// Run the action against `host`. Unknown ids are logged and skipped;
    /// the rest of a sequence still runs.
    pub fn execute<H: TriggerHost + ?Sized>(&self, host: &mut H) {
        let known = match self {
            Self::ShowToast { message, duration } => {
                host.show_toast(message, *duration);
                true
            }
            Self::PlaySound { sound } => {
                host.play_sound(sound);
                true
            }
            Self::StartQuest { quest } => host.start_quest(quest),
            Self::UpdateObjective {
                quest,
                objective,
                amount,
            } => host.update_objective(quest, objective, *amount),
            Self::CompleteQuest { quest } => host.complete_quest(quest),
            Self::SetFlag { flag, value } => {
                host.set_flag(flag, *value);
                true
            }
            Self::SetCheckpoint {
                checkpoint,
                position,
            } => host.set_checkpoint(checkpoint, *position),
            Self::UnlockAbility { ability } => {
                host.unlock_ability(ability);
                true
            }
            Self::SpawnEnemy { kind, position } => host.spawn_enemy(kind, *position),
            Self::StartDialogue { dialogue } => host.start_dialogue(dialogue),
            Self::ChangeChapter { chapter } => host.change_chapter(chapter),
            Self::Sequence { actions } => {
                for action in actions {
                    action.execute(host);
                }
                true
            }
        };

        if !known {
            log::warn!("Trigger action {:?} names an unknown target, ignored", self);
        }
    }
}
