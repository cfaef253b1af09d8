// wind.rs - Gust envelope
//
// Calm -> PhaseIn -> Active -> PhaseOut -> Calm. A gust starts at random
// from Calm, ramps up, holds, ramps down. Direction is picked once per gust.

use rand::Rng;
use rand::rngs::StdRng;

// Phase timing (seconds)
pub const PHASE_IN: f32 = 1.0;
pub const PHASE_OUT: f32 = 1.5;

// Force per unit of configured intensity at full gust
pub const WIND_SCALE: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindPhase {
    Calm,
    PhaseIn,
    Active,
    PhaseOut,
}

#[derive(Clone, Debug)]
pub struct WindEnvelope {
    phase: WindPhase,
    elapsed: f32,
    intensity: f32,
    direction: f32,

    chance: f32,     // per-second gust onset chance, 0..=1
    duration: f32,   // Active hold time
    strength: f32,   // configured intensity
}

impl WindEnvelope {
    pub fn new(chance_percent: f32, storm_duration: f32, strength: f32) -> Self {
        Self {
            phase: WindPhase::Calm,
            elapsed: 0.0,
            intensity: 0.0,
            direction: 1.0,
            chance: (chance_percent / 100.0).clamp(0.0, 1.0),
            duration: storm_duration.max(0.0),
            strength,
        }
    }

    pub fn phase(&self) -> WindPhase { self.phase }
    pub fn intensity(&self) -> f32 { self.intensity }
    pub fn direction(&self) -> f32 { self.direction }
    pub fn phase_elapsed(&self) -> f32 { self.elapsed }

    /// Signed horizontal force for the current tick.
    pub fn force(&self) -> f32 {
        self.direction * self.intensity * self.strength * WIND_SCALE
    }

    /// Back to Calm with no gust in flight.
    pub fn reset(&mut self) {
        self.phase = WindPhase::Calm;
        self.elapsed = 0.0;
        self.intensity = 0.0;
    }

    /// Step the envelope by `dt` and return the resulting force.
    ///
    /// Timed phases hand their overshoot to the next phase, so a gust lasts
    /// PHASE_IN + duration + PHASE_OUT of simulated time whatever the tick
    /// size.
    pub fn advance(&mut self, dt: f32, rng: &mut StdRng) -> f32 {
        self.elapsed += dt;

        match self.phase {
            WindPhase::Calm => {
                self.intensity = 0.0;
                if dt > 0.0 && rng.random::<f32>() < onset_probability(self.chance, dt) {
                    self.phase = WindPhase::PhaseIn;
                    self.elapsed = 0.0;
                    self.direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
                }
            }
            WindPhase::PhaseIn => {
                if self.elapsed >= PHASE_IN {
                    self.enter(WindPhase::Active, PHASE_IN);
                    self.intensity = 1.0;
                    self.settle();
                } else {
                    self.intensity = (self.elapsed / PHASE_IN).min(1.0);
                }
            }
            WindPhase::Active => {
                self.intensity = 1.0;
                self.settle();
            }
            WindPhase::PhaseOut => self.settle(),
        }

        self.force()
    }

    // Resolve Active/PhaseOut exits, which may chain when the overshoot is
    // larger than a whole phase.
    fn settle(&mut self) {
        if self.phase == WindPhase::Active && self.elapsed >= self.duration {
            self.enter(WindPhase::PhaseOut, self.duration);
        }
        if self.phase == WindPhase::PhaseOut {
            if self.elapsed >= PHASE_OUT {
                self.phase = WindPhase::Calm;
                self.elapsed = 0.0;
                self.intensity = 0.0;
            } else {
                self.intensity = (1.0 - self.elapsed / PHASE_OUT).max(0.0);
            }
        }
    }

    fn enter(&mut self, phase: WindPhase, spent: f32) {
        self.phase = phase;
        self.elapsed = (self.elapsed - spent).max(0.0);
    }
}

/// Chance that a gust starts within one tick of length `dt`, given a
/// per-second chance. Exactly 1 at 100% and 0 at 0%.
#[inline]
pub fn onset_probability(per_second: f32, dt: f32) -> f32 {
    if per_second >= 1.0 {
        return 1.0;
    }
    1.0 - (1.0 - per_second).powf(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn calm_never_lasts_past_one_tick_at_full_chance() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut wind = WindEnvelope::new(100.0, 3.0, 5.0);
        wind.advance(DT, &mut rng);
        assert_eq!(wind.phase(), WindPhase::PhaseIn);
    }

    #[test]
    fn zero_chance_stays_calm() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut wind = WindEnvelope::new(0.0, 3.0, 5.0);
        for _ in 0..10_000 {
            assert_eq!(wind.advance(DT, &mut rng), 0.0);
        }
        assert_eq!(wind.phase(), WindPhase::Calm);
    }

    #[test]
    fn envelope_ramps_holds_and_fades() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut wind = WindEnvelope::new(100.0, 3.0, 5.0);
        wind.advance(0.05, &mut rng);
        assert_eq!(wind.intensity(), 0.0);

        for _ in 0..10 {
            wind.advance(0.05, &mut rng);
        }
        // 0.5s into PhaseIn
        assert_eq!(wind.phase(), WindPhase::PhaseIn);
        assert!((wind.intensity() - 0.5).abs() < 1e-4);

        for _ in 0..20 {
            wind.advance(0.05, &mut rng);
        }
        assert_eq!(wind.phase(), WindPhase::Active);
        assert_eq!(wind.intensity(), 1.0);
        assert_eq!(wind.force().abs(), 5.0 * WIND_SCALE);

        // Rest of Active plus half of PhaseOut
        for _ in 0..65 {
            wind.advance(0.05, &mut rng);
        }
        assert_eq!(wind.phase(), WindPhase::PhaseOut);
        assert!((wind.intensity() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn oversized_step_chains_through_phases() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut wind = WindEnvelope::new(100.0, 0.1, 5.0);
        wind.advance(0.01, &mut rng);
        // PhaseIn overshoot of 0.5 passes Active (0.1) into PhaseOut
        wind.advance(1.5, &mut rng);
        assert_eq!(wind.phase(), WindPhase::PhaseOut);
        assert!((wind.phase_elapsed() - 0.4).abs() < 1e-4);
    }

    #[test]
    fn onset_probability_limits() {
        assert_eq!(onset_probability(1.0, DT), 1.0);
        assert_eq!(onset_probability(0.0, DT), 0.0);
        let p = onset_probability(0.2, DT);
        assert!(p > 0.0 && p < 0.2 * DT * 1.2);
    }

    #[test]
    fn reset_returns_to_calm() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut wind = WindEnvelope::new(100.0, 3.0, 5.0);
        wind.advance(DT, &mut rng);
        wind.advance(0.5, &mut rng);
        wind.reset();
        assert_eq!(wind.phase(), WindPhase::Calm);
        assert_eq!(wind.force(), 0.0);
    }
}
