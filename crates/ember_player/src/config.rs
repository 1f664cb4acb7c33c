//! Player tuning

use ember_combat::AttackDef;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Player movement and combat tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Maximum health
    pub max_health: f32,
    /// Maximum warmth
    pub max_warmth: f32,
    /// Body half-extents
    pub half_extents: Vec2,
    /// Horizontal acceleration while a direction is held
    pub run_acceleration: f32,
    /// Horizontal speed cap
    pub max_run_speed: f32,
    /// Multiplier on `run_acceleration` while airborne
    pub air_control: f32,
    /// Fraction of horizontal speed kept per second with no input on ground
    pub ground_braking: f32,
    /// Upward velocity set by a jump
    pub jump_speed: f32,
    /// Grace period after leaving ground during which a jump still works
    pub coyote_time: f32,
    /// How long an early jump press is remembered
    pub jump_buffer_time: f32,
    /// Time to chain the next attack before the combo resets
    pub combo_window: f32,
    /// Attack table, cycled by combo index
    pub attacks: Vec<AttackDef>,
    /// Invulnerability granted by a landed hit
    pub invulnerability_time: f32,
    /// Stagger time after a landed hit
    pub hurt_time: f32,
    /// Invulnerability granted on respawn
    pub respawn_invulnerability: f32,
    /// Parry window length
    pub parry_window: f32,
    /// Time between parries
    pub parry_cooldown: f32,
    /// Depth of the ground probe below the feet
    pub ground_probe_depth: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 5.0,
            max_warmth: 100.0,
            half_extents: Vec2::new(0.4, 0.9),
            run_acceleration: 60.0,
            max_run_speed: 7.0,
            air_control: 0.5,
            ground_braking: 0.0001,
            jump_speed: 13.0,
            coyote_time: 0.1,
            jump_buffer_time: 0.12,
            combo_window: 0.5,
            attacks: AttackDef::player_combo(),
            invulnerability_time: 0.8,
            hurt_time: 0.25,
            respawn_invulnerability: 1.5,
            parry_window: 0.2,
            parry_cooldown: 0.8,
            ground_probe_depth: 0.1,
        }
    }
}

impl PlayerConfig {
    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_invulnerability_time(mut self, seconds: f32) -> Self {
        self.invulnerability_time = seconds;
        self
    }

    pub fn with_coyote_time(mut self, seconds: f32) -> Self {
        self.coyote_time = seconds;
        self
    }

    pub fn with_jump_buffer_time(mut self, seconds: f32) -> Self {
        self.jump_buffer_time = seconds;
        self
    }

    pub fn with_attacks(mut self, attacks: Vec<AttackDef>) -> Self {
        self.attacks = attacks;
        self
    }
}
