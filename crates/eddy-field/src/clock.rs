//! Simulated time for frame-driven evaluation.

/// Monotone simulated time, advanced once per display frame.
///
/// The accumulated `time` feeds the `t` variable of every formula scope.
/// It is process-lifetime only and never resets; recompiling a field or
/// switching modes leaves it running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    /// Accumulated simulated time.
    pub time: f32,
    /// Increment applied per frame.
    pub step: f32,
    /// Frames elapsed since startup.
    pub frame: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            time: 0.0,
            step: 0.01,
            frame: 0,
        }
    }
}

impl Clock {
    /// Creates a clock at t = 0 with the default per-frame step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-frame step.
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Advances time by one frame.
    pub fn advance(&mut self) {
        self.time += self.step;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = Clock::new();
        for _ in 0..3 {
            clock.advance();
        }
        assert!((clock.time - 0.03).abs() < 1e-6);
        assert_eq!(clock.frame, 3);
    }

    #[test]
    fn test_custom_step() {
        let mut clock = Clock::new().with_step(0.5);
        clock.advance();
        assert_eq!(clock.time, 0.5);
    }
}
