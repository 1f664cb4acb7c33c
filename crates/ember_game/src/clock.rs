//! Frame pacing: real frame deltas in, whole fixed ticks out

use crate::config::FrameConfig;

/// Turns the host's per-frame callback into fixed simulation ticks.
///
/// Each frame delta is clamped to `max_frame_dt` and at most
/// `max_ticks_per_frame` ticks run per frame. Time beyond that is dropped
/// so one slow frame cannot snowball into ever longer catch-up frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    config: FrameConfig,
    accumulator: f32,
    dropped: f32,
}

impl FrameClock {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            dropped: 0.0,
        }
    }

    /// Feed one frame's real delta. Returns how many ticks to run.
    pub fn advance(&mut self, real_dt: f32) -> u32 {
        let dt = if real_dt.is_finite() {
            real_dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };
        self.accumulator += dt;

        let fixed = self.config.fixed_dt;
        let mut ticks = 0;
        while self.accumulator + f32::EPSILON >= fixed && ticks < self.config.max_ticks_per_frame {
            self.accumulator -= fixed;
            ticks += 1;
        }

        if ticks == self.config.max_ticks_per_frame && self.accumulator >= fixed {
            self.dropped += self.accumulator;
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);
        ticks
    }

    /// Fraction of a tick left in the accumulator, for interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.config.fixed_dt).clamp(0.0, 1.0)
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    /// Simulation time thrown away by the tick cap
    pub fn dropped_time(&self) -> f32 {
        self.dropped
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_one_tick_per_frame_at_target_rate() {
        let mut clock = FrameClock::new(FrameConfig::default());
        for _ in 0..120 {
            assert_eq!(clock.advance(DT), 1);
        }
    }

    #[test]
    fn test_accumulates_short_frames() {
        let mut clock = FrameClock::new(FrameConfig::default());
        assert_eq!(clock.advance(DT * 0.5), 0);
        assert!(clock.alpha() > 0.4);
        assert_eq!(clock.advance(DT * 0.5), 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new(FrameConfig::default().with_max_frame_dt(0.25));
        // A 2 second hitch is clamped to 0.25 s, then capped at 5 ticks
        assert_eq!(clock.advance(2.0), 5);
        assert!(clock.dropped_time() > 0.1);
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.advance(DT), 1);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = FrameClock::new(FrameConfig::default());
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
    }
}
