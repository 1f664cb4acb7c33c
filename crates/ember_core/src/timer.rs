//! Tick-driven timers

use serde::{Deserialize, Serialize};

/// A timer that counts down by the delta it is ticked with
///
/// A countdown is "active" while it has time remaining. It never goes
/// negative and never advances on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// An inactive countdown
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    /// A countdown already running for `duration` seconds
    pub fn started(duration: f32) -> Self {
        let mut timer = Self::idle();
        timer.start(duration);
        timer
    }

    /// (Re)start with the given duration, replacing whatever was left
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Advance by `dt`. Returns true on the tick the countdown reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

/// An absolute end time in simulation seconds
///
/// The end time can be pushed later but never earlier: extending a window
/// that already runs longer than the request leaves it untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    until: f32,
}

impl Deadline {
    pub const fn none() -> Self {
        Self { until: 0.0 }
    }

    /// Move the end time to `until` if that is later than the current one.
    /// Returns whether the end time changed.
    pub fn extend_to(&mut self, until: f32) -> bool {
        if until > self.until {
            self.until = until;
            true
        } else {
            false
        }
    }

    /// Whether `now` falls before the end time
    pub fn is_active(&self, now: f32) -> bool {
        now < self.until
    }

    pub fn until(&self) -> f32 {
        self.until
    }

    /// Seconds left at `now`
    pub fn remaining(&self, now: f32) -> f32 {
        (self.until - now).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires_once() {
        let mut timer = Countdown::started(0.1);
        assert!(timer.is_active());
        assert!(!timer.tick(0.05));
        assert!(timer.tick(0.05));
        assert!(!timer.is_active());
        assert!(!timer.tick(0.05));
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn test_countdown_restart_and_clear() {
        let mut timer = Countdown::idle();
        assert!(!timer.is_active());
        timer.start(1.0);
        timer.tick(0.25);
        timer.start(1.0);
        assert_eq!(timer.remaining(), 1.0);
        timer.clear();
        assert!(!timer.is_active());
    }

    #[test]
    fn test_negative_duration_is_idle() {
        let timer = Countdown::started(-1.0);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_deadline_only_moves_forward() {
        let mut deadline = Deadline::none();
        assert!(deadline.extend_to(2.0));
        assert!(!deadline.extend_to(1.0));
        assert_eq!(deadline.until(), 2.0);
        assert!(deadline.is_active(1.5));
        assert!(!deadline.is_active(2.0));
        assert_eq!(deadline.remaining(3.0), 0.0);
    }
}
