/// Elapsed-time gate for discrete toggles driven from held-key state:
/// admits one firing, then refuses further ones until the window has
/// drained.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    window: f32,
    remaining: f32,
}

impl Debounce {
    pub fn new(window_secs: f32) -> Self {
        Self {
            window: window_secs,
            remaining: 0.0,
        }
    }

    /// Drain the window by the frame delta. Call once per frame.
    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }

    /// True when the gate is open; firing closes it for a full window.
    pub fn try_fire(&mut self) -> bool {
        if self.remaining > 0.0 {
            return false;
        }
        self.remaining = self.window;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_then_blocks_inside_window() {
        let mut gate = Debounce::new(0.3);
        assert!(gate.try_fire());
        assert!(!gate.try_fire());
        gate.tick(0.1);
        assert!(!gate.try_fire());
    }

    #[test]
    fn reopens_after_window_drains() {
        let mut gate = Debounce::new(0.3);
        assert!(gate.try_fire());
        gate.tick(0.2);
        gate.tick(0.2);
        assert!(gate.try_fire());
    }
}
