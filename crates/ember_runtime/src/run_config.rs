//! Run configuration
//!
//! Determines which level the headless runtime plays and for how long.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Command line: first positional argument is the level path
//! 2. Environment variables: `EMBERFALL_LEVEL`, `EMBERFALL_TICKS`,
//!    `EMBERFALL_SAVE`
//! 3. Config file: `emberfall.toml` in the working directory
//!
//! # Example Config File
//!
//! ```toml
//! level = "levels/frozen_hollow.json"
//! ticks = 600
//! save_path = "checkpoint.json"
//!
//! [game.frame]
//! fixed_dt = 0.016666668
//! max_ticks_per_frame = 5
//!
//! [game.player]
//! max_health = 6.0
//!
//! [[script]]
//! at = 0
//! hold = 120
//! intents = ["move_right"]
//!
//! [[script]]
//! at = 30
//! intents = ["jump"]
//! ```

use crate::error::{Result, RuntimeError};
use ember_game::GameConfig;
use ember_player::{InputFrame, InputIntent};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scripted input: `intents` are pressed at tick `at` and held for `hold`
/// ticks (a single tick when `hold` is zero)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at: u64,
    #[serde(default)]
    pub hold: u64,
    pub intents: Vec<InputIntent>,
}

impl ScriptStep {
    fn covers(&self, tick: u64) -> bool {
        tick >= self.at && tick < self.at + self.hold.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Session configuration
    pub game: GameConfig,
    /// Level manifest (JSON)
    pub level: Option<String>,
    /// Number of fixed ticks to simulate
    pub ticks: u64,
    /// Where the latest checkpoint is written
    pub save_path: Option<String>,
    /// Scripted input replayed during the run
    pub script: Vec<ScriptStep>,
    /// Config file path (for reloading)
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            level: None,
            ticks: 600,
            save_path: None,
            script: Vec::new(),
            config_path: None,
        }
    }
}

impl RunConfig {
    /// Load the run configuration from all sources
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        for path in ["emberfall.toml", "config/emberfall.toml"] {
            if Path::new(path).exists() {
                config = Self::load_from_file(path)?;
                config.config_path = Some(path.to_string());
                log::info!("Loaded run config from {}", path);
                break;
            }
        }

        if let Ok(level) = std::env::var("EMBERFALL_LEVEL") {
            if !level.is_empty() {
                config.level = Some(level);
            }
        }

        if let Ok(ticks) = std::env::var("EMBERFALL_TICKS") {
            match ticks.parse() {
                Ok(ticks) => config.ticks = ticks,
                Err(_) => log::warn!("Ignoring invalid EMBERFALL_TICKS '{}'", ticks),
            }
        }

        if let Ok(save) = std::env::var("EMBERFALL_SAVE") {
            if !save.is_empty() {
                config.save_path = Some(save);
            }
        }

        // First non-flag argument is the level path
        if let Some(level) = std::env::args().skip(1).find(|arg| !arg.starts_with("--")) {
            log::info!("Level from args: {}", level);
            config.level = Some(level);
        }

        Ok(config)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.game.frame.validate()?;
        Ok(config)
    }

    /// Input for `tick`. Steps are merged in script order.
    pub fn input_for(&self, tick: u64) -> InputFrame {
        self.script
            .iter()
            .filter(|step| step.covers(tick))
            .flat_map(|step| step.intents.iter().copied())
            .collect()
    }

    pub fn print_summary(&self) {
        log::info!("Run Configuration:");
        log::info!("  Level: {}", self.level.as_deref().unwrap_or("(none)"));
        log::info!(
            "  Ticks: {} at {:.4}s",
            self.ticks,
            self.game.frame.fixed_dt
        );
        log::info!("  Script steps: {}", self.script.len());
        if let Some(path) = &self.save_path {
            log::info!("  Save: {}", path);
        }
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.ticks, 600);
        assert!(config.level.is_none());
        assert!(config.script.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = RunConfig::from_toml(
            r#"
            level = "levels/frozen_hollow.json"
            ticks = 120

            [game.player]
            max_health = 8.0

            [[script]]
            at = 0
            hold = 10
            intents = ["move_right"]

            [[script]]
            at = 5
            intents = ["jump", "attack"]
            "#,
        )
        .unwrap();

        assert_eq!(config.level.as_deref(), Some("levels/frozen_hollow.json"));
        assert_eq!(config.ticks, 120);
        assert_eq!(config.game.player.max_health, 8.0);
        assert_eq!(config.game.frame.max_ticks_per_frame, 5);
        assert_eq!(config.script.len(), 2);
    }

    #[test]
    fn test_rejects_bad_frame() {
        let result = RunConfig::from_toml(
            r#"
            [game.frame]
            fixed_dt = -1.0
            "#,
        );
        assert!(matches!(result, Err(RuntimeError::Game(_))));
    }

    #[test]
    fn test_scripted_input() {
        let config = RunConfig {
            script: vec![
                ScriptStep {
                    at: 0,
                    hold: 3,
                    intents: vec![InputIntent::MoveRight],
                },
                ScriptStep {
                    at: 2,
                    hold: 0,
                    intents: vec![InputIntent::Jump],
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            config.input_for(2),
            InputFrame::new()
                .with(InputIntent::MoveRight)
                .with(InputIntent::Jump)
        );
        assert!(!config.input_for(3).contains(InputIntent::Jump));
        assert!(config.input_for(3).is_empty());
        assert!(config.input_for(1).contains(InputIntent::MoveRight));
    }
}
