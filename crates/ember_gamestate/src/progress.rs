//! Progress tracking: flags, achievements and play statistics

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Achievement definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Hidden until unlocked
    #[serde(default)]
    pub hidden: bool,
    /// Target value for progressive achievements
    pub target: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub unlocked: bool,
    /// Simulation time of the unlock
    #[serde(default)]
    pub unlocked_at: Option<f32>,
}

impl Achievement {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            hidden: false,
            target: 1,
            current: 0,
            unlocked: false,
            unlocked_at: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set target for progressive achievement
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = target.max(1);
        self
    }

    pub fn progress(&self) -> f32 {
        if self.target == 0 {
            return 1.0;
        }
        (self.current as f32 / self.target as f32).min(1.0)
    }

    /// Add progress. Returns true if this call unlocked the achievement.
    pub fn increment(&mut self, amount: u32, now: f32) -> bool {
        if self.unlocked {
            return false;
        }
        self.current = self.current.saturating_add(amount).min(self.target);
        if self.current >= self.target {
            return self.unlock(now);
        }
        false
    }

    /// Unlock outright. Returns false if already unlocked.
    pub fn unlock(&mut self, now: f32) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.current = self.target;
        self.unlocked_at = Some(now);
        true
    }
}

/// Statistics, flags and achievements for one playthrough
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProgressTracker {
    achievements: HashMap<String, Achievement>,
    stats: HashMap<String, i64>,
    play_time: f64,
    flags: BTreeMap<String, bool>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // Achievement methods

    pub fn register_achievement(&mut self, achievement: Achievement) {
        self.achievements.insert(achievement.id.clone(), achievement);
    }

    pub fn get_achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.get(id)
    }

    /// Increment achievement progress. Returns true when it just unlocked.
    pub fn increment_achievement(&mut self, id: &str, amount: u32) -> bool {
        let now = self.play_time as f32;
        match self.achievements.get_mut(id) {
            Some(achievement) => achievement.increment(amount, now),
            None => {
                log::warn!("Unknown achievement '{}'", id);
                false
            }
        }
    }

    /// Unlock an achievement. Returns true when it just unlocked.
    pub fn unlock_achievement(&mut self, id: &str) -> bool {
        let now = self.play_time as f32;
        match self.achievements.get_mut(id) {
            Some(achievement) => {
                let unlocked = achievement.unlock(now);
                if unlocked {
                    log::info!("Achievement unlocked: {}", achievement.name);
                }
                unlocked
            }
            None => {
                log::warn!("Unknown achievement '{}'", id);
                false
            }
        }
    }

    pub fn achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.values()
    }

    pub fn unlocked_achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.values().filter(|a| a.unlocked)
    }

    /// Locked achievements, visible ones only
    pub fn locked_achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.values().filter(|a| !a.unlocked && !a.hidden)
    }

    // Statistics

    pub fn stat(&self, name: &str) -> i64 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    pub fn add_stat(&mut self, name: &str, amount: i64) {
        *self.stats.entry(name.to_string()).or_insert(0) += amount;
    }

    pub fn add_play_time(&mut self, seconds: f64) {
        self.play_time += seconds.max(0.0);
    }

    pub fn play_time(&self) -> f64 {
        self.play_time
    }

    /// Count a defeated enemy, in total and per kind
    pub fn add_kill(&mut self, kind: &str) {
        self.add_stat("kills", 1);
        self.add_stat(&format!("kills:{}", kind), 1);
    }

    pub fn kills(&self) -> i64 {
        self.stat("kills")
    }

    pub fn kills_of(&self, kind: &str) -> i64 {
        self.stat(&format!("kills:{}", kind))
    }

    pub fn add_death(&mut self) {
        self.add_stat("deaths", 1);
    }

    pub fn deaths(&self) -> i64 {
        self.stat("deaths")
    }

    // Flags

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn toggle_flag(&mut self, name: &str) -> bool {
        let entry = self.flags.entry(name.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    /// Replace every flag, e.g. from a checkpoint
    pub fn restore_flags(&mut self, flags: BTreeMap<String, bool>) {
        self.flags = flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progressive_achievement() {
        let mut achievement = Achievement::new("wisp_hunter", "Wisp Hunter").with_target(4);

        assert!(!achievement.increment(2, 1.0));
        assert_eq!(achievement.progress(), 0.5);
        assert!(achievement.increment(5, 2.0));
        assert_eq!(achievement.current, 4);
        assert_eq!(achievement.unlocked_at, Some(2.0));
        assert!(!achievement.increment(1, 3.0));
    }

    #[test]
    fn test_tracker_achievements() {
        let mut tracker = ProgressTracker::new();
        tracker.register_achievement(Achievement::new("first_flame", "First Flame"));
        tracker.register_achievement(Achievement::new("secret", "Secret").hidden());

        assert_eq!(tracker.locked_achievements().count(), 1);
        assert!(tracker.unlock_achievement("first_flame"));
        assert!(!tracker.unlock_achievement("first_flame"));
        assert!(!tracker.unlock_achievement("missing"));
        assert_eq!(tracker.unlocked_achievements().count(), 1);
    }

    #[test]
    fn test_stats() {
        let mut tracker = ProgressTracker::new();

        tracker.add_kill("frost_wisp");
        tracker.add_kill("frost_wisp");
        tracker.add_kill("ice_brute");
        tracker.add_death();
        tracker.add_play_time(90.0);
        tracker.add_play_time(-5.0);

        assert_eq!(tracker.kills(), 3);
        assert_eq!(tracker.kills_of("frost_wisp"), 2);
        assert_eq!(tracker.deaths(), 1);
        assert_eq!(tracker.play_time(), 90.0);
    }

    #[test]
    fn test_flags() {
        let mut tracker = ProgressTracker::new();

        assert!(!tracker.has_flag("met_elder"));
        tracker.set_flag("met_elder", true);
        assert!(tracker.has_flag("met_elder"));
        assert!(!tracker.toggle_flag("met_elder"));

        let mut restored = BTreeMap::new();
        restored.insert("bridge_down".to_string(), true);
        tracker.restore_flags(restored);
        assert!(tracker.has_flag("bridge_down"));
        assert!(!tracker.has_flag("met_elder"));
    }
}
