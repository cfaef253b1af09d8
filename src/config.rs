// config.rs - Snowfall options
//
// The host owns a SnowConfig, clamps it with `validated` and hands it to the
// simulation. Power-save is folded in by `derive_effective_config`, which is
// recomputed only when the mode flips.

use thiserror::Error;
use wasm_bindgen::prelude::*;

use crate::sim::MAX_FLAKES;
use crate::world::MAX_PROPS;

// Defaults
pub const DEFAULT_MAX_PARTICLES: u32 = 200;
pub const DEFAULT_FALL_SPEED: f32 = 12.0;
pub const DEFAULT_SPAWN_RATE: f32 = 0.1;
pub const DEFAULT_WIND_INTENSITY: f32 = 5.0;
pub const DEFAULT_WIND_CHANCE: f32 = 20.0;
pub const DEFAULT_STORM_DURATION: f32 = 3.0;
pub const DEFAULT_PROP_COUNT: u32 = 12;
pub const DEFAULT_PROP_SCALE_MIN: f32 = 0.8;
pub const DEFAULT_PROP_SCALE_MAX: f32 = 1.3;
pub const DEFAULT_FLAKE_VARIANTS: u8 = 7;
pub const DEFAULT_PROP_SPRITE: (u32, u32) = (128, 160);

// Power-save never drops below this many flakes
pub const POWER_SAVE_FLOOR: u32 = 25;

/// Which horizontal step the integrator applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindCoupling {
    /// Bigger flakes catch more wind: `force * (0.5 + size_scale)`.
    #[default]
    SizeScaled,
    /// Each flake drifts by its own susceptibility on top of the force.
    Susceptibility,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnowConfig {
    pub max_particles: u32,
    pub base_fall_speed: f32,
    pub spawn_rate: f32,
    pub wind_intensity: f32,
    pub wind_chance_percent: f32,
    pub wind_storm_duration: f32,
    pub prop_count: u32,
    pub prop_scale_min: f32,
    pub prop_scale_max: f32,
    pub power_save: bool,
    pub flake_variants: u8,
    pub prop_sprite: (u32, u32),
    pub wind_coupling: WindCoupling,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            base_fall_speed: DEFAULT_FALL_SPEED,
            spawn_rate: DEFAULT_SPAWN_RATE,
            wind_intensity: DEFAULT_WIND_INTENSITY,
            wind_chance_percent: DEFAULT_WIND_CHANCE,
            wind_storm_duration: DEFAULT_STORM_DURATION,
            prop_count: DEFAULT_PROP_COUNT,
            prop_scale_min: DEFAULT_PROP_SCALE_MIN,
            prop_scale_max: DEFAULT_PROP_SCALE_MAX,
            power_save: false,
            flake_variants: DEFAULT_FLAKE_VARIANTS,
            prop_sprite: DEFAULT_PROP_SPRITE,
            wind_coupling: WindCoupling::SizeScaled,
        }
    }
}

impl SnowConfig {
    /// Clamp every option into its supported range.
    ///
    /// NaN floats fall back to their defaults. If the prop scale range is
    /// inverted the max is raised to the min.
    pub fn validated(&self) -> Self {
        let mut c = self.clone();
        c.max_particles = c.max_particles.clamp(50, MAX_FLAKES as u32);
        c.base_fall_speed = clamp_or(c.base_fall_speed, 1.0, 40.0, DEFAULT_FALL_SPEED);
        c.spawn_rate = clamp_or(c.spawn_rate, 0.01, 1.0, DEFAULT_SPAWN_RATE);
        c.wind_intensity = clamp_or(c.wind_intensity, 1.0, 60.0, DEFAULT_WIND_INTENSITY);
        c.wind_chance_percent = clamp_or(c.wind_chance_percent, 0.0, 100.0, DEFAULT_WIND_CHANCE);
        c.wind_storm_duration = clamp_or(c.wind_storm_duration, 0.1, 60.0, DEFAULT_STORM_DURATION);
        c.prop_count = c.prop_count.min(MAX_PROPS as u32);
        c.prop_scale_min = clamp_or(c.prop_scale_min, 0.1, 2.0, DEFAULT_PROP_SCALE_MIN);
        c.prop_scale_max = clamp_or(c.prop_scale_max, 0.1, 2.0, DEFAULT_PROP_SCALE_MAX);
        if c.prop_scale_min > c.prop_scale_max {
            c.prop_scale_max = c.prop_scale_min;
        }
        c.flake_variants = c.flake_variants.clamp(1, 16);
        c.prop_sprite = (c.prop_sprite.0.max(1), c.prop_sprite.1.max(1));
        c
    }

    /// Set one option from its textual form, e.g. `("max-snowflakes", "150")`.
    ///
    /// Keys follow the command-line switch names without the leading dashes.
    /// Values are stored as parsed; call `validated` afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let bad = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "max-snowflakes" => self.max_particles = value.parse().map_err(|_| bad())?,
            "snow-speed" => self.base_fall_speed = value.parse().map_err(|_| bad())?,
            "spawn-rate" => self.spawn_rate = value.parse().map_err(|_| bad())?,
            "wind-intensity" => self.wind_intensity = value.parse().map_err(|_| bad())?,
            "wind-chance" => self.wind_chance_percent = value.parse().map_err(|_| bad())?,
            "storm-duration" => self.wind_storm_duration = value.parse().map_err(|_| bad())?,
            "trees" => self.prop_count = value.parse().map_err(|_| bad())?,
            "tree-scale-min" => self.prop_scale_min = value.parse().map_err(|_| bad())?,
            "tree-scale-max" => self.prop_scale_max = value.parse().map_err(|_| bad())?,
            "variants" => self.flake_variants = value.parse().map_err(|_| bad())?,
            "power-save" => {
                self.power_save = match value.to_ascii_lowercase().as_str() {
                    "true" | "1" | "on" | "yes" => true,
                    "false" | "0" | "off" | "no" => false,
                    _ => return Err(bad()),
                }
            }
            "wind-coupling" => {
                self.wind_coupling = match value {
                    "size" => WindCoupling::SizeScaled,
                    "susceptibility" => WindCoupling::Susceptibility,
                    _ => return Err(bad()),
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Read options from a plain JS object. Unknown or non-numeric fields are
    /// ignored; a bare number is taken as the particle cap.
    pub fn from_js(value: &JsValue) -> Self {
        let mut config = Self::default();

        if !value.is_object() {
            if let Some(count) = value.as_f64() {
                config.max_particles = count as u32;
            }
            return config;
        }

        macro_rules! extract {
            ($field:ident, $key:expr, $ty:ty) => {
                if let Ok(v) = js_sys::Reflect::get(value, &$key.into()) {
                    if let Some(num) = v.as_f64() {
                        config.$field = num as $ty;
                    }
                }
            };
        }

        extract!(max_particles, "maxParticles", u32);
        extract!(base_fall_speed, "baseFallSpeed", f32);
        extract!(spawn_rate, "spawnRate", f32);
        extract!(wind_intensity, "windIntensity", f32);
        extract!(wind_chance_percent, "windChancePercent", f32);
        extract!(wind_storm_duration, "windStormDuration", f32);
        extract!(prop_count, "propCount", u32);
        extract!(prop_scale_min, "propScaleMin", f32);
        extract!(prop_scale_max, "propScaleMax", f32);
        extract!(flake_variants, "flakeVariants", u8);

        if let Ok(v) = js_sys::Reflect::get(value, &"powerSave".into()) {
            if let Some(b) = v.as_bool() {
                config.power_save = b;
            }
        }

        if let Ok(v) = js_sys::Reflect::get(value, &"propSprite".into()) {
            if js_sys::Array::is_array(&v) {
                let arr: js_sys::Array = v.into();
                if let (Some(w), Some(h)) = (arr.get(0).as_f64(), arr.get(1).as_f64()) {
                    config.prop_sprite = (w as u32, h as u32);
                }
            }
        }

        if let Ok(v) = js_sys::Reflect::get(value, &"windCoupling".into()) {
            if v.as_string().as_deref() == Some("susceptibility") {
                config.wind_coupling = WindCoupling::Susceptibility;
            }
        }

        config
    }
}

/// The options the simulation actually runs with, after power-save.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveConfig {
    pub capacity: u32,
    pub base_fall_speed: f32,
    pub spawn_rate: f32,
    pub wind_intensity: f32,
    pub wind_chance_percent: f32,
    pub wind_storm_duration: f32,
    pub prop_count: u32,
    pub prop_scale_min: f32,
    pub prop_scale_max: f32,
    pub flake_variants: u8,
    pub prop_sprite: (u32, u32),
    pub wind_coupling: WindCoupling,
    pub power_save: bool,
}

/// Fold the power-save mode into a base config.
pub fn derive_effective_config(base: &SnowConfig, power_save: bool) -> EffectiveConfig {
    let capacity = if power_save {
        power_save_capacity(base.max_particles)
    } else {
        base.max_particles
    };

    EffectiveConfig {
        capacity,
        base_fall_speed: base.base_fall_speed,
        spawn_rate: base.spawn_rate,
        wind_intensity: base.wind_intensity,
        wind_chance_percent: base.wind_chance_percent,
        wind_storm_duration: base.wind_storm_duration,
        prop_count: base.prop_count,
        prop_scale_min: base.prop_scale_min,
        prop_scale_max: base.prop_scale_max,
        flake_variants: base.flake_variants,
        prop_sprite: base.prop_sprite,
        wind_coupling: base.wind_coupling,
        power_save,
    }
}

/// Half the cap, but never below the floor and never above the cap itself.
#[inline]
pub fn power_save_capacity(cap: u32) -> u32 {
    (cap / 2).max(POWER_SAVE_FLOOR).min(cap)
}

#[inline]
fn clamp_or(v: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(lo, hi) }
}
