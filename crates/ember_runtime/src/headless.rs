//! Headless play-through of a level
//!
//! Stands in for the browser shell: feeds scripted input into the session,
//! logs notifications the UI would present, and writes checkpoints the way
//! the persistence layer would.

use crate::error::{Result, RuntimeError};
use crate::run_config::RunConfig;
use ember_game::{GameSession, LevelManifest, Notification};
use ember_gamestate::CheckpointData;
use glam::Vec2;

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub level: String,
    pub ticks: u64,
    pub kills: i64,
    pub deaths: i64,
    pub quests_completed: usize,
    pub checkpoints: usize,
    pub final_position: Option<Vec2>,
}

pub fn load_manifest(path: &str) -> Result<LevelManifest> {
    let json = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
        path: path.to_string(),
        source,
    })?;
    Ok(LevelManifest::from_json(&json)?)
}

/// Play `manifest` for `config.ticks` ticks
pub fn run(config: &RunConfig, manifest: &LevelManifest) -> Result<RunSummary> {
    let mut session = GameSession::new(config.game.clone())?;
    let report = session.load_level(manifest)?;
    if report.skipped > 0 {
        log::warn!("{} level entries skipped", report.skipped);
    }

    let mut summary = RunSummary {
        level: manifest.id.clone(),
        ..Default::default()
    };

    for tick in 0..config.ticks {
        session.tick(&config.input_for(tick))?;
        for notification in session.drain_notifications() {
            present(&notification, config, &mut summary)?;
        }
    }

    summary.ticks = session.tick_count();
    summary.kills = session.progress().kills();
    summary.deaths = session.progress().deaths();
    summary.final_position = session.player_position()?;
    Ok(summary)
}

fn present(notification: &Notification, config: &RunConfig, summary: &mut RunSummary) -> Result<()> {
    match notification {
        Notification::Toast { message, .. } => log::info!("[toast] {}", message),
        Notification::Dialogue { dialogue } => log::info!("[dialogue] {}", dialogue),
        Notification::QuestCompleted { quest } => {
            summary.quests_completed += 1;
            log::info!("[quest] '{}' completed", quest);
        }
        Notification::CheckpointReached { checkpoint, data } => {
            summary.checkpoints += 1;
            log::info!("[checkpoint] '{}'", checkpoint);
            if let Some(path) = &config.save_path {
                save(path, data)?;
            }
        }
        Notification::PlayerDied => log::info!("[player] died"),
        Notification::EnemyDefeated { kind, .. } => log::info!("[combat] {} defeated", kind),
        Notification::BossPhaseChanged { from, to, .. } => {
            log::info!("[combat] boss phase {} -> {}", from, to)
        }
        other => log::debug!("{:?}", other),
    }
    Ok(())
}

fn save(path: &str, data: &CheckpointData) -> Result<()> {
    std::fs::write(path, data.to_json()?).map_err(|source| RuntimeError::Io {
        path: path.to_string(),
        source,
    })?;
    log::debug!("Checkpoint written to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_config::ScriptStep;
    use ember_player::InputIntent;

    const LEVEL: &str = r#"{
        "id": "frozen_hollow",
        "chapter": "chapter_1",
        "spawn": [0.0, 1.0],
        "platforms": [{ "region": { "min": [-30.0, -1.0], "max": [30.0, 0.0] } }],
        "triggers": [
            {
                "id": "intro",
                "region": { "area": { "min": [-2.0, 0.0], "max": [2.0, 3.0] } },
                "action": { "type": "start_quest", "quest": "embers" }
            }
        ],
        "quests": [
            { "id": "embers", "objectives": [{ "id": "gather", "target": 1 }] }
        ]
    }"#;

    #[test]
    fn test_headless_run() {
        let manifest = LevelManifest::from_json(LEVEL).unwrap();
        let config = RunConfig {
            ticks: 60,
            script: vec![ScriptStep {
                at: 0,
                hold: 30,
                intents: vec![InputIntent::MoveRight],
            }],
            ..Default::default()
        };

        let summary = run(&config, &manifest).unwrap();

        assert_eq!(summary.level, "frozen_hollow");
        assert_eq!(summary.ticks, 60);
        assert_eq!(summary.deaths, 0);
        assert!(summary.final_position.unwrap().x > 0.5);
    }

    #[test]
    fn test_missing_level_file() {
        assert!(matches!(
            load_manifest("/nonexistent/level.json"),
            Err(RuntimeError::Io { .. })
        ));
    }
}
