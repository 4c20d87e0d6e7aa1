use std::time::{Duration, Instant};

/// Frame timing snapshot passed to application `update`.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds elapsed since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots with clamped delta time.
///
/// The clamp keeps downstream simulation stable when the process is paused by
/// a debugger, the window is minimized for a while, or a frame stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Resets the baseline, e.g. after device-loss recovery.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_to_bounds() {
        let mut clock = FrameClock::new();
        // Immediate tick: below dt_min, clamps up.
        let ft = clock.tick();
        assert!(ft.dt >= 0.0001);
        assert!(ft.dt <= 0.25);
    }

    #[test]
    fn frame_index_increments() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn long_stall_clamps_to_max() {
        let mut clock = FrameClock::new();
        clock.last = Instant::now() - Duration::from_secs(5);
        assert!((clock.tick().dt - 0.25).abs() < 1e-6);
    }
}
