// physics.rs - Flake integration
//
// Fall, drift with the wind, wrap sideways, respawn at the top once a flake
// is past the bottom edge.

use rand::rngs::StdRng;

use super::{Bounds, Flakes};
use crate::config::WindCoupling;

// Abstract speed units -> surface units per second
pub const FALL_SCALE: f32 = 20.0;

// Off-screen band where flakes wrap or recycle, about one flake wide
pub const WRAP_MARGIN: f32 = 32.0;
pub const BOTTOM_MARGIN: f32 = 16.0;

/// Per-tick integration parameters.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub dt: f32,
    pub wind_force: f32,
    pub base_speed: f32,
    pub coupling: WindCoupling,
    pub variants: u8,
}

/// Advance every active flake by one step.
///
/// Degenerate bounds leave all flakes untouched.
pub fn advance(flakes: &mut Flakes, step: Step, bounds: Bounds, rng: &mut StdRng) {
    if bounds.is_degenerate() { return; }

    let w = bounds.width as f32;
    let h = bounds.height as f32;
    let span = w + 2.0 * WRAP_MARGIN;
    let fall = step.dt * FALL_SCALE;

    for i in 0..flakes.capacity() {
        if !flakes.active[i] { continue; }

        flakes.y[i] += (flakes.speed[i] + step.base_speed) * fall;
        flakes.x[i] += match step.coupling {
            WindCoupling::SizeScaled => step.wind_force * step.dt * (0.5 + flakes.size[i]),
            WindCoupling::Susceptibility => (flakes.wind[i] + step.wind_force) * step.dt,
        };

        // Wrap horizontally
        if flakes.x[i] < -WRAP_MARGIN {
            flakes.x[i] += span;
        } else if flakes.x[i] > w + WRAP_MARGIN {
            flakes.x[i] -= span;
        }

        // Past the bottom: recycle in place
        if flakes.y[i] > h + BOTTOM_MARGIN {
            flakes.respawn(i, bounds, step.base_speed, step.variants, rng);
        }
    }
}
