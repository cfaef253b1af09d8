// render.rs - Encode simulation snapshots to output buffers
//
// Output layout (for canvas rendering), one record per entity:
//   flakes = [x, y, size_scale, variant] * active flakes
//   props  = [x, y, rendered_width, rendered_height] * props
//
// Buffers are sized for the largest pool up front and rewritten in place after
// every tick, so the pointers stay valid. A reader must not overlap `encode`;
// a host that renders on another thread has to copy out or lock around it.

use crate::sim::{MAX_FLAKES, Simulation};
use crate::world::MAX_PROPS;

pub const FLAKE_STRIDE: usize = 4;
pub const PROP_STRIDE: usize = 4;

pub struct Encoder {
    flakes: Vec<f32>,
    props: Vec<f32>,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            flakes: Vec::with_capacity(MAX_FLAKES * FLAKE_STRIDE),
            props: Vec::with_capacity(MAX_PROPS * PROP_STRIDE),
        }
    }

    pub fn clear(&mut self) {
        self.flakes.clear();
        self.props.clear();
    }

    /// Encode the current flakes and props
    pub fn encode(&mut self, sim: &Simulation) {
        self.clear();

        for f in sim.flakes() {
            self.flakes.extend_from_slice(&[f.x, f.y, f.size_scale, f.variant as f32]);
        }

        for p in sim.props() {
            self.props.extend_from_slice(&[p.x, p.y, p.rendered_width(), p.rendered_height()]);
        }
    }

    pub fn flakes(&self) -> &[f32] { &self.flakes }
    pub fn props(&self) -> &[f32] { &self.props }

    pub fn flake_count(&self) -> usize { self.flakes.len() / FLAKE_STRIDE }
    pub fn prop_count(&self) -> usize { self.props.len() / PROP_STRIDE }

    pub fn flakes_ptr(&self) -> *const f32 { self.flakes.as_ptr() }
    pub fn props_ptr(&self) -> *const f32 { self.props.as_ptr() }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
