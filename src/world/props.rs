// props.rs - Tree placement
//
// A batch of randomly scaled props along the bottom edge. The layout is
// cached and only rebuilt when the surface size changes.

use log::debug;
use rand::Rng;
use rand::rngs::StdRng;

use crate::sim::Bounds;

pub const MAX_PROPS: usize = 36;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Prop {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub width: u32,    // source sprite size
    pub height: u32,
}

impl Prop {
    #[inline]
    pub fn rendered_width(&self) -> f32 {
        self.width as f32 * self.scale
    }

    #[inline]
    pub fn rendered_height(&self) -> f32 {
        self.height as f32 * self.scale
    }
}

/// Placement options, taken from the effective config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropLayout {
    pub count: u32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub sprite: (u32, u32),
}

pub struct PropField {
    items: [Prop; MAX_PROPS],
    n: usize,
    placed_for: Option<Bounds>,
}

impl PropField {
    pub fn new() -> Self {
        Self {
            items: [Prop::default(); MAX_PROPS],
            n: 0,
            placed_for: None,
        }
    }

    /// Drop the cached layout; the next `ensure_placed` rebuilds it.
    pub fn clear(&mut self) {
        self.n = 0;
        self.placed_for = None;
    }

    /// Place props for `bounds` unless the cached layout already matches.
    /// Returns true when the layout was rebuilt.
    ///
    /// Degenerate bounds keep whatever layout is cached. An empty layout is
    /// cached like any other.
    pub fn ensure_placed(&mut self, bounds: Bounds, layout: &PropLayout, rng: &mut StdRng) -> bool {
        if bounds.is_degenerate() { return false; }
        if self.placed_for == Some(bounds) { return false; }

        let w = bounds.width as f32;
        let h = bounds.height as f32;
        let (sw, sh) = layout.sprite;
        let count = (layout.count as usize).min(MAX_PROPS);

        for i in 0..count {
            let scale = layout.scale_min + rng.random::<f32>() * (layout.scale_max - layout.scale_min);
            let rw = sw as f32 * scale;
            let rh = sh as f32 * scale;

            self.items[i] = Prop {
                x: rng.random::<f32>() * (w - rw).max(0.0),
                y: h - rh,
                scale,
                width: sw,
                height: sh,
            };
        }

        self.n = count;
        self.placed_for = Some(bounds);
        debug!("placed {} props for {}x{}", count, bounds.width, bounds.height);
        true
    }

    pub fn props(&self) -> &[Prop] {
        &self.items[..self.n]
    }
}

impl Default for PropField {
    fn default() -> Self {
        Self::new()
    }
}
