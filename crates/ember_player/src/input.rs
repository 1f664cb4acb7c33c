//! Input intents

use serde::{Deserialize, Serialize};

/// A discrete request from the input layer, consumed at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputIntent {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    Parry,
}

impl InputIntent {
    /// Movement is held across ticks; everything else is a one-shot press
    pub fn is_held(self) -> bool {
        matches!(self, InputIntent::MoveLeft | InputIntent::MoveRight)
    }
}

/// Every intent gathered for one tick, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputFrame {
    intents: Vec<InputIntent>,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, intent: InputIntent) -> Self {
        self.intents.push(intent);
        self
    }

    pub fn push(&mut self, intent: InputIntent) {
        self.intents.push(intent);
    }

    pub fn iter(&self) -> impl Iterator<Item = InputIntent> + '_ {
        self.intents.iter().copied()
    }

    pub fn contains(&self, intent: InputIntent) -> bool {
        self.intents.contains(&intent)
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn clear(&mut self) {
        self.intents.clear();
    }
}

impl FromIterator<InputIntent> for InputFrame {
    fn from_iter<I: IntoIterator<Item = InputIntent>>(iter: I) -> Self {
        Self {
            intents: iter.into_iter().collect(),
        }
    }
}
