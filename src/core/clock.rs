use std::time::Instant;

/// Per-frame timing sample.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the clock started. Drives time-based effects
    /// (lamp flicker) that need an absolute phase.
    pub elapsed: f32,
}

/// Frame clock: call [`Clock::tick`] once per frame.
#[derive(Debug)]
pub struct Clock {
    started: Instant,
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
        }
    }

    pub fn tick(&mut self) -> FrameTick {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        FrameTick {
            delta,
            elapsed: now.duration_since(self.started).as_secs_f32(),
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tick_measures_delta_and_elapsed() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let first = clock.tick();
        assert!(first.delta >= 0.009);
        assert!(first.elapsed >= first.delta - 1e-4);

        thread::sleep(Duration::from_millis(10));
        let second = clock.tick();
        assert!(second.elapsed > first.elapsed);
    }
}
