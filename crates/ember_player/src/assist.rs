//! Jump assists and combo tracking
//!
//! Both types are pure timer logic with no physics access, so the rules
//! can be tested tick by tick.

use ember_core::Countdown;

/// Result of pressing jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpResult {
    /// The jump happened now
    Jumped,
    /// No ground within the coyote window; remembered for landing
    Buffered,
    /// The player cannot act (dead)
    Ignored,
}

/// Coyote time and jump buffering
#[derive(Debug, Clone)]
pub struct JumpAssist {
    coyote_time: f32,
    buffer_time: f32,
    coyote: Countdown,
    buffer: Countdown,
}

impl JumpAssist {
    pub fn new(coyote_time: f32, buffer_time: f32) -> Self {
        Self {
            coyote_time,
            buffer_time,
            coyote: Countdown::idle(),
            buffer: Countdown::idle(),
        }
    }

    /// Feed this tick's grounded state. Ground refills the coyote timer,
    /// air drains it. The jump buffer drains either way.
    pub fn observe(&mut self, grounded: bool, dt: f32) {
        if grounded {
            self.coyote.start(self.coyote_time);
        } else {
            self.coyote.tick(dt);
        }
        self.buffer.tick(dt);
    }

    /// Jump pressed
    pub fn press(&mut self) -> JumpResult {
        if self.coyote.is_active() {
            self.coyote.clear();
            self.buffer.clear();
            JumpResult::Jumped
        } else {
            self.buffer.start(self.buffer_time);
            JumpResult::Buffered
        }
    }

    /// Consume a buffered jump if the player is on the ground
    pub fn take_buffered(&mut self, grounded: bool) -> bool {
        if grounded && self.buffer.is_active() {
            self.buffer.clear();
            self.coyote.clear();
            true
        } else {
            false
        }
    }

    pub fn coyote_remaining(&self) -> f32 {
        self.coyote.remaining()
    }

    pub fn buffer_remaining(&self) -> f32 {
        self.buffer.remaining()
    }

    pub fn reset(&mut self) {
        self.coyote.clear();
        self.buffer.clear();
    }
}

/// Combo index, chaining window and attack cooldown
#[derive(Debug, Clone)]
pub struct ComboTracker {
    combo_window: f32,
    index: u32,
    window: Countdown,
    cooldown: Countdown,
}

impl ComboTracker {
    pub fn new(combo_window: f32) -> Self {
        Self {
            combo_window,
            index: 0,
            window: Countdown::idle(),
            cooldown: Countdown::idle(),
        }
    }

    /// Advance timers. The combo resets to the first attack when its window
    /// runs out.
    pub fn tick(&mut self, dt: f32) {
        if self.window.tick(dt) {
            self.index = 0;
        }
        self.cooldown.tick(dt);
    }

    /// Table slot of the next attack, or `None` while cooling down
    pub fn next_slot(&self, table_len: usize) -> Option<usize> {
        if self.cooldown.is_active() || table_len == 0 {
            None
        } else {
            Some(self.index as usize % table_len)
        }
    }

    /// Record that an attack was performed. The index wraps back to the
    /// first attack after the last table entry.
    pub fn commit(&mut self, cooldown: f32, table_len: usize) {
        self.index = if table_len == 0 {
            0
        } else {
            ((self.index as usize + 1) % table_len) as u32
        };
        self.window.start(self.combo_window);
        self.cooldown.start(cooldown);
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown.is_active()
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.window.clear();
        self.cooldown.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_jump_on_ground() {
        let mut assist = JumpAssist::new(0.1, 0.12);
        assist.observe(true, DT);
        assert_eq!(assist.press(), JumpResult::Jumped);
        assert_eq!(assist.coyote_remaining(), 0.0);
    }

    #[test]
    fn test_coyote_time_after_leaving_ledge() {
        let mut assist = JumpAssist::new(0.1, 0.12);
        assist.observe(true, DT);
        // 5 airborne ticks (~83ms) is still inside the 100ms grace period
        for _ in 0..5 {
            assist.observe(false, DT);
        }
        assert_eq!(assist.press(), JumpResult::Jumped);
    }

    #[test]
    fn test_late_jump_is_buffered() {
        let mut assist = JumpAssist::new(0.1, 0.12);
        assist.observe(true, DT);
        for _ in 0..10 {
            assist.observe(false, DT);
        }
        assert_eq!(assist.press(), JumpResult::Buffered);
        assert!(assist.buffer_remaining() > 0.0);
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        let mut assist = JumpAssist::new(0.1, 0.12);
        assert_eq!(assist.press(), JumpResult::Buffered);
        assist.observe(false, DT);
        assert!(!assist.take_buffered(false));
        assist.observe(true, DT);
        assert!(assist.take_buffered(true));
        // consumed
        assert!(!assist.take_buffered(true));
    }

    #[test]
    fn test_buffer_expires() {
        let mut assist = JumpAssist::new(0.1, 0.12);
        assist.press();
        for _ in 0..8 {
            assist.observe(false, DT);
        }
        assist.observe(true, DT);
        assert!(!assist.take_buffered(true));
    }

    #[test]
    fn test_combo_cycles_table() {
        let mut combo = ComboTracker::new(0.5);
        let mut slots = Vec::new();
        for _ in 0..4 {
            let slot = combo.next_slot(3).unwrap();
            slots.push(slot);
            combo.commit(0.1, 3);
            assert!(combo.index() < 3);
            for _ in 0..7 {
                combo.tick(DT);
            }
        }
        assert_eq!(slots, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_cooldown_blocks_attack() {
        let mut combo = ComboTracker::new(0.5);
        combo.commit(0.2, 3);
        assert_eq!(combo.next_slot(3), None);
        for _ in 0..12 {
            combo.tick(DT);
        }
        assert_eq!(combo.next_slot(3), Some(1));
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut combo = ComboTracker::new(0.5);
        combo.commit(0.1, 3);
        combo.commit(0.1, 3);
        assert_eq!(combo.index(), 2);
        for _ in 0..31 {
            combo.tick(DT);
        }
        assert_eq!(combo.index(), 0);
        assert_eq!(combo.next_slot(3), Some(0));
    }
}
