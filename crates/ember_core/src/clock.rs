//! Simulation clock

/// Number of whole ticks of length `dt` covering `seconds`, at least one
pub fn ticks_for(seconds: f32, dt: f32) -> u32 {
    if dt <= 0.0 || !seconds.is_finite() {
        return 1;
    }
    // Tolerate float noise so 0.2s at 60Hz is 12 ticks, not 13
    ((seconds / dt - 1e-3).ceil().max(0.0) as u32).max(1)
}

/// Counts fixed ticks and derives simulation time from them
///
/// Time is computed as `ticks * dt` rather than accumulated, so it does not
/// drift over long sessions.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    fixed_dt: f32,
}

impl SimClock {
    pub fn new(fixed_dt: f32) -> Self {
        Self { tick: 0, fixed_dt }
    }

    /// Advance one tick and return the new tick number
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Simulation time in seconds
    pub fn now(&self) -> f32 {
        (self.tick as f64 * self.fixed_dt as f64) as f32
    }

    /// Number of whole ticks covering `seconds`, at least one
    pub fn ticks_for(&self, seconds: f32) -> u32 {
        ticks_for(seconds, self.fixed_dt)
    }
}
