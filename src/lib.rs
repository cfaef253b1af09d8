use wasm_bindgen::prelude::*;

// ============================================================================
// SNOW WORLD - Ambient snowfall with wind gusts and trees
// ============================================================================

pub mod config;
pub mod render;
pub mod sim;
pub mod world;

pub use config::{ConfigError, EffectiveConfig, SnowConfig, WindCoupling, derive_effective_config};
pub use render::Encoder;
pub use sim::{Bounds, FlakeView, Simulation, WindPhase};
pub use world::Prop;

#[wasm_bindgen]
pub struct SnowWorld {
    sim: Simulation,
    encoder: Encoder,
    bounds: Bounds,
}

#[wasm_bindgen]
impl SnowWorld {
    /// `config` is a plain object (see `SnowConfig::from_js`) or undefined.
    #[wasm_bindgen(constructor)]
    pub fn new(w: i32, h: i32, config: JsValue) -> Self {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        Self::with_seed(w, h, config, seed)
    }

    /// Deterministic variant of the constructor.
    pub fn with_seed(w: i32, h: i32, config: JsValue, seed: u64) -> Self {
        Self {
            sim: Simulation::new(SnowConfig::from_js(&config), seed),
            encoder: Encoder::new(),
            bounds: Bounds::new(w, h),
        }
    }

    /// Advance by `dt` seconds and refresh the output buffers.
    pub fn tick(&mut self, dt: f32) {
        self.sim.tick(dt, self.bounds);
        self.encoder.encode(&self.sim);
    }

    pub fn resize(&mut self, w: i32, h: i32) {
        self.bounds = Bounds::new(w, h);
    }

    pub fn set_power_save(&mut self, enabled: bool) {
        self.sim.set_power_save(enabled);
    }

    pub fn reset(&mut self) {
        self.sim.reset_all();
        self.encoder.clear();
    }

    pub fn reconfigure(&mut self, config: JsValue) {
        self.sim.reconfigure(SnowConfig::from_js(&config));
        self.encoder.clear();
    }

    /// Current wind force, signed (negative blows left).
    pub fn wind(&self) -> f32 { self.sim.wind().force() }

    // Accessors for WASM
    pub fn flakes_ptr(&self) -> *const f32 { self.encoder.flakes_ptr() }
    pub fn flake_count(&self) -> usize { self.encoder.flake_count() }
    pub fn props_ptr(&self) -> *const f32 { self.encoder.props_ptr() }
    pub fn prop_count(&self) -> usize { self.encoder.prop_count() }
    pub fn width(&self) -> i32 { self.bounds.width }
    pub fn height(&self) -> i32 { self.bounds.height }
}
