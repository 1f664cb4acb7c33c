//! Trigger conditions

use crate::host::WorldState;
use serde::{Deserialize, Serialize};

/// Predicate over world state that gates a trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerCondition {
    #[default]
    Always,
    FlagSet {
        flag: String,
    },
    FlagUnset {
        flag: String,
    },
    QuestActive {
        quest: String,
    },
    QuestCompleted {
        quest: String,
    },
    HasAbility {
        ability: String,
    },
    All {
        conditions: Vec<TriggerCondition>,
    },
    Any {
        conditions: Vec<TriggerCondition>,
    },
    Not {
        condition: Box<TriggerCondition>,
    },
}

impl TriggerCondition {
    pub fn flag_set(flag: impl Into<String>) -> Self {
        Self::FlagSet { flag: flag.into() }
    }

    pub fn quest_completed(quest: impl Into<String>) -> Self {
        Self::QuestCompleted {
            quest: quest.into(),
        }
    }

    pub fn evaluate<W: WorldState + ?Sized>(&self, world: &W) -> bool {
        match self {
            Self::Always => true,
            Self::FlagSet { flag } => world.has_flag(flag),
            Self::FlagUnset { flag } => !world.has_flag(flag),
            Self::QuestActive { quest } => world.is_quest_active(quest),
            Self::QuestCompleted { quest } => world.is_quest_completed(quest),
            Self::HasAbility { ability } => world.has_ability(ability),
            Self::All { conditions } => conditions.iter().all(|c| c.evaluate(world)),
            Self::Any { conditions } => conditions.iter().any(|c| c.evaluate(world)),
            Self::Not { condition } => !condition.evaluate(world),
        }
    }
}
