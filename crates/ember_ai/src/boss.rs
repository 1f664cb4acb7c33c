//! Boss phases and attack patterns

use ember_combat::AttackDef;
use serde::{Deserialize, Serialize};

/// One boss phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossPhase {
    pub name: String,
    pub speed_multiplier: f32,
    pub damage_multiplier: f32,
    /// Attacks cycled round-robin while in this phase. An empty table
    /// falls back to the enemy's basic attack.
    pub patterns: Vec<AttackDef>,
}

impl Default for BossPhase {
    fn default() -> Self {
        Self {
            name: String::new(),
            speed_multiplier: 1.0,
            damage_multiplier: 1.0,
            patterns: Vec::new(),
        }
    }
}

/// Boss phase layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Health fractions at which the next phase starts, e.g. `[0.66, 0.33]`
    pub thresholds: Vec<f32>,
    /// Phase definitions; index 0 is the opening phase. Missing entries
    /// reuse the last one.
    pub phases: Vec<BossPhase>,
}

/// A phase transition, reported once per threshold crossed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub from: usize,
    pub to: usize,
    pub threshold: f32,
}

/// Boss phase tracking and pattern cycling
#[derive(Debug, Clone)]
pub struct BossAi {
    thresholds: Vec<f32>,
    phases: Vec<BossPhase>,
    phase: usize,
    pattern_index: usize,
}

impl BossAi {
    pub fn new(config: BossConfig) -> Self {
        let mut thresholds: Vec<f32> = config
            .thresholds
            .into_iter()
            .filter(|t| *t > 0.0 && *t < 1.0)
            .collect();
        thresholds.sort_by(|a, b| b.total_cmp(a));
        thresholds.dedup();

        let mut phases = config.phases;
        if phases.is_empty() {
            phases.push(BossPhase::default());
        }

        Self {
            thresholds,
            phases,
            phase: 0,
            pattern_index: 0,
        }
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn phase_count(&self) -> usize {
        self.thresholds.len() + 1
    }

    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    pub fn current_phase(&self) -> &BossPhase {
        let last = self.phases.len() - 1;
        &self.phases[self.phase.min(last)]
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.current_phase().speed_multiplier
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.current_phase().damage_multiplier
    }

    /// Advance through every threshold at or above `health_fraction`.
    /// The phase never goes back, so healing has no effect here.
    pub fn observe_health(&mut self, health_fraction: f32) -> Vec<PhaseChange> {
        let mut changes = Vec::new();
        while let Some(&threshold) = self.thresholds.get(self.phase) {
            if health_fraction > threshold {
                break;
            }
            changes.push(PhaseChange {
                from: self.phase,
                to: self.phase + 1,
                threshold,
            });
            self.phase += 1;
            self.pattern_index = 0;
        }
        changes
    }

    /// The attack the current phase would use next, with its pattern slot.
    /// `None` when the phase has no patterns.
    pub fn peek_pattern(&self) -> Option<(usize, &AttackDef)> {
        let patterns = &self.current_phase().patterns;
        if patterns.is_empty() {
            return None;
        }
        let slot = self.pattern_index % patterns.len();
        Some((slot, &patterns[slot]))
    }

    /// Move the cycle past the pattern returned by [`peek_pattern`](Self::peek_pattern)
    pub fn advance_pattern(&mut self) {
        let len = self.current_phase().patterns.len();
        if len > 0 {
            self.pattern_index = (self.pattern_index % len + 1) % len;
        }
    }

    /// The next attack of the current phase, advancing the cycle
    pub fn next_pattern(&mut self) -> Option<(usize, AttackDef)> {
        let (slot, attack) = self.peek_pattern().map(|(slot, attack)| (slot, attack.clone()))?;
        self.advance_pattern();
        Some((slot, attack))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BossConfig {
        BossConfig {
            thresholds: vec![0.33, 0.66],
            phases: vec![
                BossPhase {
                    name: "calm".into(),
                    patterns: vec![AttackDef::new("sweep", 1.0), AttackDef::new("stomp", 1.0)],
                    ..Default::default()
                },
                BossPhase {
                    name: "angry".into(),
                    speed_multiplier: 1.5,
                    damage_multiplier: 2.0,
                    patterns: vec![
                        AttackDef::new("volley", 1.0),
                        AttackDef::new("sweep", 1.0),
                        AttackDef::new("dive", 1.0),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_phase_only_advances() {
        let mut boss = BossAi::new(config());
        assert!(boss.observe_health(0.9).is_empty());

        let changes = boss.observe_health(0.5);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].to, 1);
        assert_eq!(changes[0].threshold, 0.66);

        // Healing back above the threshold does nothing
        assert!(boss.observe_health(1.0).is_empty());
        assert_eq!(boss.phase(), 1);
        // Same threshold is never reported twice
        assert!(boss.observe_health(0.5).is_empty());
    }

    #[test]
    fn test_multiple_thresholds_in_one_hit() {
        let mut boss = BossAi::new(config());
        let changes = boss.observe_health(0.1);
        assert_eq!(changes.len(), 2);
        assert_eq!(boss.phase(), 2);
        // Phase 2 reuses the last definition
        assert_eq!(boss.current_phase().name, "angry");
        assert_eq!(boss.damage_multiplier(), 2.0);
    }

    #[test]
    fn test_patterns_round_robin() {
        let mut boss = BossAi::new(config());
        let names: Vec<String> = (0..5)
            .filter_map(|_| boss.next_pattern())
            .map(|(_, attack)| attack.name)
            .collect();
        assert_eq!(names, vec!["sweep", "stomp", "sweep", "stomp", "sweep"]);
    }

    #[test]
    fn test_phase_change_restarts_cycle() {
        let mut boss = BossAi::new(config());
        boss.next_pattern();
        boss.observe_health(0.5);
        let (slot, attack) = boss.next_pattern().unwrap();
        assert_eq!(slot, 0);
        assert_eq!(attack.name, "volley");
        assert_eq!(boss.speed_multiplier(), 1.5);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut boss = BossAi::new(config());
        let (slot, _) = boss.peek_pattern().unwrap();
        assert_eq!(boss.peek_pattern().unwrap().0, slot);
        assert_eq!(boss.pattern_index(), 0);
        boss.advance_pattern();
        assert_eq!(boss.pattern_index(), 1);
    }

    #[test]
    fn test_no_patterns() {
        let mut boss = BossAi::new(BossConfig::default());
        assert_eq!(boss.phase_count(), 1);
        assert!(boss.next_pattern().is_none());
        assert!(boss.observe_health(0.0).is_empty());
    }
}
