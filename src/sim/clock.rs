// clock.rs - Run time and step clamping

/// Longest step the simulation will integrate in one tick.
pub const MAX_DT: f32 = 1.0 / 15.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct Clock {
    elapsed: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp a host step and add it to the run time.
    ///
    /// NaN and negative steps count as zero so a bad timer never rewinds
    /// or poisons the state.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_DT) };
        self.elapsed += dt;
        dt
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stalls_are_clamped() {
        let mut clock = Clock::new();
        assert_eq!(clock.tick(2.0), MAX_DT);
        assert_eq!(clock.elapsed(), MAX_DT);
    }

    #[test]
    fn bad_steps_count_as_zero() {
        let mut clock = Clock::new();
        clock.tick(0.01);
        assert_eq!(clock.tick(-1.0), 0.0);
        assert_eq!(clock.tick(f32::NAN), 0.0);
        assert_eq!(clock.elapsed(), 0.01);
    }

    #[test]
    fn reset_zeroes_run_time() {
        let mut clock = Clock::new();
        clock.tick(0.05);
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
    }
}
