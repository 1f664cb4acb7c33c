//! Checkpoints and the persisted subset of game state

use crate::quest::QuestProgress;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Checkpoint data format version
pub const CHECKPOINT_VERSION: u32 = 1;

/// Checkpoint encoding errors
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Version mismatch: checkpoint version {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

pub type Result<T> = std::result::Result<T, CheckpointError>;

/// What gets persisted at a checkpoint
///
/// The core never writes this anywhere; the persistence collaborator takes
/// the encoded bytes or JSON and stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointData {
    pub version: u32,
    pub level: String,
    pub chapter: String,
    pub checkpoint: Option<String>,
    pub spawn: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub warmth: f32,
    pub abilities: BTreeSet<String>,
    pub flags: BTreeMap<String, bool>,
    pub quests: Vec<QuestProgress>,
    pub play_time: f64,
}

impl CheckpointData {
    pub fn new(level: impl Into<String>, chapter: impl Into<String>, spawn: Vec2) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            level: level.into(),
            chapter: chapter.into(),
            checkpoint: None,
            spawn,
            health: 0.0,
            max_health: 0.0,
            warmth: 0.0,
            abilities: BTreeSet::new(),
            flags: BTreeMap::new(),
            quests: Vec::new(),
            play_time: 0.0,
        }
    }

    pub fn with_checkpoint(mut self, id: impl Into<String>) -> Self {
        self.checkpoint = Some(id.into());
        self
    }

    pub fn with_health(mut self, health: f32, max_health: f32) -> Self {
        self.health = health;
        self.max_health = max_health;
        self
    }

    pub fn with_warmth(mut self, warmth: f32) -> Self {
        self.warmth = warmth;
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self =
            serde_json::from_str(json).map_err(|e| CheckpointError::Deserialization(e.to_string()))?;
        data.check_version()
    }

    /// Compact binary encoding
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let data: Self =
            bincode::deserialize(bytes).map_err(|e| CheckpointError::Deserialization(e.to_string()))?;
        data.check_version()
    }

    fn check_version(self) -> Result<Self> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                found: self.version,
                expected: CHECKPOINT_VERSION,
            });
        }
        Ok(self)
    }
}

/// A checkpoint location in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub level: String,
    pub position: Vec2,
    #[serde(default)]
    pub activated: bool,
}

impl Checkpoint {
    pub fn new(id: impl Into<String>, level: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            level: level.into(),
            position,
            activated: false,
        }
    }
}

/// Known checkpoints, the active one and the last recorded data
#[derive(Debug, Default)]
pub struct CheckpointManager {
    checkpoints: HashMap<String, Checkpoint>,
    current: Option<String>,
    latest: Option<CheckpointData>,
}

impl CheckpointManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checkpoint, replacing one with the same id
    pub fn register(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.insert(checkpoint.id.clone(), checkpoint);
    }

    pub fn get(&self, id: &str) -> Option<&Checkpoint> {
        self.checkpoints.get(id)
    }

    /// Make `id` the respawn point. Unknown ids are ignored.
    pub fn activate(&mut self, id: &str) -> bool {
        let Some(checkpoint) = self.checkpoints.get_mut(id) else {
            log::warn!("Cannot activate unknown checkpoint '{}'", id);
            return false;
        };
        checkpoint.activated = true;
        self.current = Some(id.to_string());
        log::info!("Checkpoint '{}' activated", id);
        true
    }

    pub fn current(&self) -> Option<&Checkpoint> {
        self.current.as_ref().and_then(|id| self.checkpoints.get(id))
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Spawn position of the active checkpoint
    pub fn spawn(&self) -> Option<Vec2> {
        self.current().map(|c| c.position)
    }

    /// Keep the data captured at the latest checkpoint event
    pub fn record(&mut self, data: CheckpointData) {
        self.latest = Some(data);
    }

    pub fn latest(&self) -> Option<&CheckpointData> {
        self.latest.as_ref()
    }

    pub fn activated_count(&self) -> usize {
        self.checkpoints.values().filter(|c| c.activated).count()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Forget the checkpoints of `level`
    pub fn reset_level(&mut self, level: &str) {
        self.checkpoints.retain(|_, c| c.level != level);
        if self.current().is_none() {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.checkpoints.clear();
        self.current = None;
        self.latest = None;
    }
}
