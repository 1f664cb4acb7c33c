//! Session configuration

use crate::error::{GameError, Result};
use ember_physics::PhysicsConfig;
use ember_player::PlayerConfig;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Frame pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Simulation tick length in seconds
    pub fixed_dt: f32,
    /// Longest frame delta accepted; slower frames are clamped
    pub max_frame_dt: f32,
    /// Upper bound on ticks run for a single frame
    pub max_ticks_per_frame: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_frame_dt: 0.1,
            max_ticks_per_frame: 5,
        }
    }
}

impl FrameConfig {
    pub fn with_fixed_dt(mut self, fixed_dt: f32) -> Self {
        self.fixed_dt = fixed_dt;
        self
    }

    pub fn with_max_frame_dt(mut self, max_frame_dt: f32) -> Self {
        self.max_frame_dt = max_frame_dt;
        self
    }

    pub fn with_max_ticks_per_frame(mut self, ticks: u32) -> Self {
        self.max_ticks_per_frame = ticks;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_dt > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if self.max_ticks_per_frame == 0 {
            return Err(GameError::InvalidConfig(
                "max_ticks_per_frame must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a [`GameSession`](crate::GameSession) is built from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub frame: FrameConfig,
    /// Spawn used when a level has none
    pub fallback_spawn: Vec2,
}

impl GameConfig {
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_player(mut self, player: PlayerConfig) -> Self {
        self.player = player;
        self
    }

    pub fn with_frame(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_fallback_spawn(mut self, spawn: Vec2) -> Self {
        self.fallback_spawn = spawn;
        self
    }

    /// Physics configuration stepping once per simulation tick
    pub fn physics_for_ticks(&self) -> PhysicsConfig {
        self.physics.clone().with_timestep(self.frame.fixed_dt)
    }
}
