//! Shipped level files build cleanly

use ember_game::prelude::*;
use ember_player::InputFrame;

const FROZEN_HOLLOW: &str = include_str!("../../../levels/frozen_hollow.json");

#[test]
fn test_frozen_hollow_builds_without_skips() {
    let manifest = LevelManifest::from_json(FROZEN_HOLLOW).unwrap();
    let mut session = GameSession::new(GameConfig::default()).unwrap();

    let report = session.load_level(&manifest).unwrap();

    assert_eq!(report.skipped, 0);
    assert!(!report.fallback_spawn);
    assert_eq!(report.enemies, 3);
    assert_eq!(report.triggers, manifest.triggers.len());
    assert!(session.enemies().iter().any(|e| e.is_boss()));
}

#[test]
fn test_frozen_hollow_intro_starts_quest() {
    let manifest = LevelManifest::from_json(FROZEN_HOLLOW).unwrap();
    let mut session = GameSession::new(GameConfig::default()).unwrap();
    session.load_level(&manifest).unwrap();

    for _ in 0..5 {
        session.tick(&InputFrame::new()).unwrap();
    }

    assert!(session.quests().is_active("embers"));
    let notifications = session.drain_notifications();
    assert!(notifications.contains(&Notification::QuestStarted {
        quest: "embers".into()
    }));
}
