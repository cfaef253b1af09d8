// sim/ - Snowfall simulation
//
// One Simulation owns everything that changes per tick: the clock, the wind
// envelope, the flake pool, the prop cache and the RNG they all draw from.
// Entity storage uses Structure-of-Arrays with fixed capacity, so a tick never
// allocates.

mod clock;
mod flake;
mod physics;
mod wind;

pub use clock::{Clock, MAX_DT};
pub use flake::{FlakeView, Flakes, fall_speed};
pub use physics::{BOTTOM_MARGIN, FALL_SCALE, Step, WRAP_MARGIN};
pub use wind::{PHASE_IN, PHASE_OUT, WIND_SCALE, WindEnvelope, WindPhase, onset_probability};

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{EffectiveConfig, SnowConfig, derive_effective_config};
use crate::world::{Prop, PropField, PropLayout};

// Capacity limits
pub const MAX_FLAKES: usize = 400;

// Seconds from a cold start until the pool is full
pub const RAMP_DURATION: f32 = 10.0;

/// Drawing surface size in surface units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Snowfall world
pub struct Simulation {
    config: SnowConfig,
    effective: EffectiveConfig,

    clock: Clock,
    wind: WindEnvelope,
    flakes: Flakes,
    props: PropField,

    rng: StdRng,
}

impl Simulation {
    /// Build a simulation from a config and an RNG seed.
    ///
    /// The config is clamped again here so a careless caller cannot size the
    /// pool outside its supported range.
    pub fn new(config: SnowConfig, seed: u64) -> Self {
        let config = config.validated();
        let effective = derive_effective_config(&config, config.power_save);

        info!(
            "snowfall: {} flakes (cap {}), {} props, seed {:#x}",
            config.max_particles, effective.capacity, config.prop_count, seed
        );

        let mut flakes = Flakes::new(config.max_particles as usize);
        flakes.apply_capacity(effective.capacity as usize);

        Self {
            wind: wind_for(&effective),
            flakes,
            props: PropField::new(),
            clock: Clock::new(),
            config,
            effective,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advance the world by one host frame.
    pub fn tick(&mut self, dt: f32, bounds: Bounds) {
        let dt = self.clock.tick(dt);
        let e = &self.effective;

        let force = self.wind.advance(dt, &mut self.rng);

        // No surface to spawn across; flakes wait until the host has a size
        if !bounds.is_degenerate() {
            self.flakes.replenish(
                self.clock.elapsed() / RAMP_DURATION,
                e.spawn_rate,
                dt,
                bounds,
                e.base_fall_speed,
                e.flake_variants,
                &mut self.rng,
            );
        }

        let step = Step {
            dt,
            wind_force: force,
            base_speed: e.base_fall_speed,
            coupling: e.wind_coupling,
            variants: e.flake_variants,
        };
        physics::advance(&mut self.flakes, step, bounds, &mut self.rng);

        self.props.ensure_placed(bounds, &prop_layout(e), &mut self.rng);
    }

    /// Switch power-save on or off. Shrinking drops excess flakes at once.
    pub fn set_power_save(&mut self, enabled: bool) {
        if self.effective.power_save == enabled { return; }

        self.effective = derive_effective_config(&self.config, enabled);
        self.flakes.apply_capacity(self.effective.capacity as usize);
        debug!(
            "power-save {}: cap {} ({} active)",
            if enabled { "on" } else { "off" },
            self.effective.capacity,
            self.flakes.active_count()
        );
    }

    /// Clear flakes, props, wind and run time. The next tick starts a fresh
    /// ramp-up.
    pub fn reset_all(&mut self) {
        self.flakes.clear();
        self.props.clear();
        self.wind.reset();
        self.clock.reset();
        debug!("simulation reset");
    }

    /// Replace the base config. The current power-save mode is kept.
    pub fn reconfigure(&mut self, config: SnowConfig) {
        let power_save = self.effective.power_save;
        self.config = config.validated();
        self.effective = derive_effective_config(&self.config, power_save);

        self.flakes = Flakes::new(self.config.max_particles as usize);
        self.flakes.apply_capacity(self.effective.capacity as usize);
        self.wind = wind_for(&self.effective);
        self.reset_all();
        debug!("reconfigured: cap {}", self.effective.capacity);
    }

    // Views for renderers

    pub fn flakes(&self) -> impl Iterator<Item = FlakeView> + '_ {
        self.flakes.views()
    }

    pub fn props(&self) -> &[Prop] {
        self.props.props()
    }

    pub fn wind(&self) -> &WindEnvelope { &self.wind }
    pub fn active_count(&self) -> usize { self.flakes.active_count() }
    pub fn effective_capacity(&self) -> usize { self.flakes.limit() }
    pub fn elapsed(&self) -> f32 { self.clock.elapsed() }
    pub fn config(&self) -> &SnowConfig { &self.config }
    pub fn effective_config(&self) -> &EffectiveConfig { &self.effective }
    pub fn power_save(&self) -> bool { self.effective.power_save }
}

fn wind_for(e: &EffectiveConfig) -> WindEnvelope {
    WindEnvelope::new(e.wind_chance_percent, e.wind_storm_duration, e.wind_intensity)
}

fn prop_layout(e: &EffectiveConfig) -> PropLayout {
    PropLayout {
        count: e.prop_count,
        scale_min: e.prop_scale_min,
        scale_max: e.prop_scale_max,
        sprite: e.prop_sprite,
    }
}
