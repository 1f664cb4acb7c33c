//! Health and resource meters

use crate::damage::{DamageInfo, DamageOutcome};
use ember_core::Deadline;
use serde::{Deserialize, Serialize};

/// Health component for players and enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthComponent {
    /// Current health, always within `[0, max]`
    current: f32,
    /// Maximum health
    max: f32,
    /// Invulnerability granted by each landed hit (i-frames)
    pub invulnerability_on_hit: f32,
    /// End of the current invulnerability window
    invulnerable_until: Deadline,
}

impl HealthComponent {
    /// Create a new health component at full health
    pub fn new(max_health: f32) -> Self {
        let max = max_health.max(0.0);
        Self {
            current: max,
            max,
            invulnerability_on_hit: 0.0,
            invulnerable_until: Deadline::none(),
        }
    }

    /// Set invulnerability time after hit
    pub fn with_invulnerability_on_hit(mut self, duration: f32) -> Self {
        self.invulnerability_on_hit = duration.max(0.0);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Remaining health as a fraction of max
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Whether an invulnerability window covers `now`
    pub fn is_invulnerable(&self, now: f32) -> bool {
        self.invulnerable_until.is_active(now)
    }

    /// End time of the invulnerability window
    pub fn invulnerable_until(&self) -> f32 {
        self.invulnerable_until.until()
    }

    /// Extend invulnerability to at least `now + duration`
    pub fn grant_invulnerability(&mut self, now: f32, duration: f32) {
        self.invulnerable_until.extend_to(now + duration.max(0.0));
    }

    /// Apply damage at simulation time `now`.
    ///
    /// The invulnerability check happens before anything else; a blocked hit
    /// leaves health and the window untouched. Dead targets ignore damage,
    /// so `Killed` is reported at most once per life.
    pub fn apply_damage(&mut self, damage: &DamageInfo, now: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        if self.is_invulnerable(now) {
            return DamageOutcome::Blocked;
        }

        let before = self.current;
        self.current = (self.current - damage.amount.max(0.0)).clamp(0.0, self.max);
        let dealt = before - self.current;

        if self.invulnerability_on_hit > 0.0 {
            self.grant_invulnerability(now, self.invulnerability_on_hit);
        }

        if self.is_dead() {
            DamageOutcome::Killed { dealt }
        } else {
            DamageOutcome::Applied {
                dealt,
                remaining: self.current,
            }
        }
    }

    /// Heal, returning the amount actually restored. Dead targets stay dead.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }

    /// Set health directly (clamped to `[0, max]`)
    pub fn set_health(&mut self, health: f32) {
        self.current = health.clamp(0.0, self.max);
    }

    /// Change the maximum, clamping current health into the new range
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.clamp(0.0, self.max);
    }

    /// Back to full health
    pub fn revive(&mut self) {
        self.current = self.max;
    }
}

/// A clamped resource pool (the player's warmth)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeter {
    current: f32,
    max: f32,
}

impl ResourceMeter {
    /// A full meter
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Remove up to `amount`, returning what was actually removed
    pub fn drain(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current - amount.max(0.0)).max(0.0);
        before - self.current
    }

    /// Add up to `amount`, returning what was actually added
    pub fn restore(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }

    /// Set directly (clamped)
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(amount: f32) -> DamageInfo {
        DamageInfo::new(amount)
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut health = HealthComponent::new(3.0);
        assert_eq!(
            health.apply_damage(&hit(10.0), 0.0),
            DamageOutcome::Killed { dealt: 3.0 }
        );
        assert_eq!(health.current(), 0.0);
        assert_eq!(health.apply_damage(&hit(1.0), 1.0), DamageOutcome::Ignored);
    }

    #[test]
    fn test_iframes_block_until_window_ends() {
        let mut health = HealthComponent::new(5.0).with_invulnerability_on_hit(0.8);

        assert!(health.apply_damage(&hit(1.0), 0.0).landed());
        assert_eq!(health.apply_damage(&hit(1.0), 0.2), DamageOutcome::Blocked);
        assert_eq!(health.current(), 4.0);
        assert!(health.apply_damage(&hit(1.0), 0.8).landed());
        assert_eq!(health.current(), 3.0);
    }

    #[test]
    fn test_blocked_hit_does_not_extend_window() {
        let mut health = HealthComponent::new(5.0).with_invulnerability_on_hit(0.8);
        health.apply_damage(&hit(1.0), 0.0);
        health.apply_damage(&hit(1.0), 0.5);
        assert_eq!(health.invulnerable_until(), 0.8);
    }

    #[test]
    fn test_invulnerability_never_shrinks() {
        let mut health = HealthComponent::new(5.0);
        health.grant_invulnerability(0.0, 3.0);
        health.grant_invulnerability(1.0, 0.5);
        assert_eq!(health.invulnerable_until(), 3.0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut health = HealthComponent::new(5.0);
        health.set_health(2.0);
        assert_eq!(health.heal(10.0), 3.0);
        assert_eq!(health.current(), 5.0);
        health.set_health(-4.0);
        assert_eq!(health.current(), 0.0);
        assert_eq!(health.heal(1.0), 0.0);
    }

    #[test]
    fn test_resource_meter_clamps() {
        let mut warmth = ResourceMeter::new(100.0);
        assert_eq!(warmth.drain(30.0), 30.0);
        assert_eq!(warmth.drain(500.0), 70.0);
        assert!(warmth.is_empty());
        assert_eq!(warmth.restore(150.0), 100.0);
        assert_eq!(warmth.current(), 100.0);
    }
}
