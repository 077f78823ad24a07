//! Wall-clock frame timing

use std::time::Instant;

/// Elapsed and delta time for one frame, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub elapsed: f32,
    pub delta: f32,
}

/// Measures time since start and since the previous tick
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    previous_elapsed: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            previous_elapsed: 0.0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance the clock to `now`; a `now` earlier than the last tick yields a zero delta
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        let delta = (elapsed - self.previous_elapsed).max(0.0);
        self.previous_elapsed = self.previous_elapsed.max(elapsed);
        FrameTime { elapsed, delta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_delta_is_time_since_previous_tick() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let first = clock.tick_at(start + Duration::from_millis(100));
        assert!((first.delta - 0.1).abs() < 1e-4);

        let second = clock.tick_at(start + Duration::from_millis(250));
        assert!((second.elapsed - 0.25).abs() < 1e-4);
        assert!((second.delta - 0.15).abs() < 1e-4);
    }

    #[test]
    fn test_time_going_backwards_yields_zero_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.tick_at(start + Duration::from_millis(500));

        let frame = clock.tick_at(start + Duration::from_millis(200));
        assert_eq!(frame.delta, 0.0);
    }
}
