// flake.rs - Falling snowflakes
//
// Fixed-slot Structure-of-Arrays pool. Slots are never freed during normal
// running: a flake that leaves the bottom edge is respawned in place.

use rand::Rng;
use rand::rngs::StdRng;

use super::{Bounds, MAX_FLAKES};

// Spawn constants
const SPAWN_STAGGER: f32 = 16.0;   // spread of spawn heights above the top edge
const SPEED_HEADROOM: f32 = 3.0;
const SPEED_FLOOR: f32 = 3.0;
const SPEED_SPREAD: f32 = 0.8;     // min speed as a fraction of max

/// Per-flake read-only view handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlakeView {
    pub x: f32,
    pub y: f32,
    pub size_scale: f32,
    pub variant: u8,
}

pub struct Flakes {
    // Position
    pub x: [f32; MAX_FLAKES],
    pub y: [f32; MAX_FLAKES],

    // Drawn once per spawn
    pub size: [f32; MAX_FLAKES],
    pub speed: [f32; MAX_FLAKES],
    pub wind: [f32; MAX_FLAKES],   // individual wind susceptibility
    pub variant: [u8; MAX_FLAKES],

    pub active: [bool; MAX_FLAKES],

    // Slots in use are 0..capacity; the cap on active flakes may be lower
    capacity: usize,
    limit: usize,
    n: usize,
    cursor: usize,
    accumulator: f32,
}

impl Flakes {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_FLAKES);
        Self {
            x: [0.0; MAX_FLAKES],
            y: [0.0; MAX_FLAKES],
            size: [0.0; MAX_FLAKES],
            speed: [0.0; MAX_FLAKES],
            wind: [0.0; MAX_FLAKES],
            variant: [0; MAX_FLAKES],
            active: [false; MAX_FLAKES],
            capacity,
            limit: capacity,
            n: 0,
            cursor: 0,
            accumulator: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current cap on active flakes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn active_count(&self) -> usize {
        self.n
    }

    pub fn clear(&mut self) {
        self.active.fill(false);
        self.n = 0;
        self.cursor = 0;
        self.accumulator = 0.0;
    }

    /// Change the cap on active flakes without touching the backing store.
    /// Excess flakes are dropped highest slot first.
    pub fn apply_capacity(&mut self, cap: usize) {
        self.limit = cap.clamp(1, self.capacity);

        let mut i = self.capacity;
        while self.n > self.limit && i > 0 {
            i -= 1;
            if self.active[i] {
                self.active[i] = false;
                self.n -= 1;
            }
        }
    }

    /// Claim one free slot and give it fresh attributes.
    ///
    /// Scans round-robin from a rotating cursor so reuse is spread over the
    /// pool. Returns false when the pool is at its cap.
    pub fn try_spawn_one(
        &mut self,
        bounds: Bounds,
        base_speed: f32,
        variants: u8,
        rng: &mut StdRng,
    ) -> bool {
        if self.n >= self.limit { return false; }

        for k in 0..self.capacity {
            let i = (self.cursor + k) % self.capacity;
            if self.active[i] { continue; }

            self.respawn(i, bounds, base_speed, variants, rng);
            self.active[i] = true;
            self.n += 1;
            self.cursor = (i + 1) % self.capacity;
            return true;
        }
        false
    }

    /// Reinitialize slot `i` at the top edge. Does not change its active flag.
    pub fn respawn(
        &mut self,
        i: usize,
        bounds: Bounds,
        base_speed: f32,
        variants: u8,
        rng: &mut StdRng,
    ) {
        let w = bounds.width.max(0) as f32;

        self.x[i] = rng.random::<f32>() * w;
        self.y[i] = -SPAWN_STAGGER * rng.random::<f32>();
        self.size[i] = 0.5 + 0.5 * rng.random::<f32>();
        self.speed[i] = fall_speed(base_speed, rng.random::<f32>());
        self.wind[i] = 0.5 * rng.random::<f32>();
        self.variant[i] = rng.random_range(0..variants.max(1));
    }

    /// Bring the population up to the ramp target, then drain the spawn
    /// token bucket.
    ///
    /// `ramp` is the run-time fraction in [0, 1]. Ramp spawns ignore the
    /// bucket so the pool fills smoothly over the ramp window.
    pub fn replenish(
        &mut self,
        ramp: f32,
        spawn_rate: f32,
        dt: f32,
        bounds: Bounds,
        base_speed: f32,
        variants: u8,
        rng: &mut StdRng,
    ) {
        let desired = (self.limit as f32 * ramp.clamp(0.0, 1.0)).round() as usize;
        while self.n < desired {
            if !self.try_spawn_one(bounds, base_speed, variants, rng) { break; }
        }

        self.accumulator += spawn_rate * dt;
        while self.accumulator >= 1.0 && self.n < self.limit {
            if !self.try_spawn_one(bounds, base_speed, variants, rng) { break; }
            self.accumulator -= 1.0;
        }
        // A full pool must not bank a burst for later
        if self.n >= self.limit {
            self.accumulator = self.accumulator.min(1.0);
        }
    }

    pub fn views(&self) -> impl Iterator<Item = FlakeView> + '_ {
        (0..self.capacity)
            .filter(|&i| self.active[i])
            .map(|i| FlakeView {
                x: self.x[i],
                y: self.y[i],
                size_scale: self.size[i],
                variant: self.variant[i],
            })
    }
}

/// Map a uniform draw onto [min, max]. `sqrt` skews draws toward max, so
/// most flakes land in the upper part of a narrow speed band.
#[inline]
pub fn fall_speed(base_speed: f32, u: f32) -> f32 {
    let max = base_speed + SPEED_HEADROOM;
    let min = (max * SPEED_SPREAD).max(SPEED_FLOOR);
    min + u.sqrt() * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const BOUNDS: Bounds = Bounds { width: 800, height: 600 };

    #[test]
    fn spawn_draws_attributes_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut flakes = Flakes::new(50);
        for _ in 0..50 {
            assert!(flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng));
        }

        for i in 0..50 {
            assert!(flakes.active[i]);
            assert!((0.0..=800.0).contains(&flakes.x[i]));
            assert!((-16.0..=0.0).contains(&flakes.y[i]));
            assert!((0.5..=1.0).contains(&flakes.size[i]));
            assert!((0.0..=0.5).contains(&flakes.wind[i]));
            assert!(flakes.variant[i] < 7);
            assert!((12.0..=15.0).contains(&flakes.speed[i]));
        }
    }

    #[test]
    fn spawn_is_noop_when_full() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut flakes = Flakes::new(3);
        for _ in 0..3 {
            flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng);
        }
        assert!(!flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng));
        assert_eq!(flakes.active_count(), 3);
    }

    #[test]
    fn spawn_cursor_rotates_through_slots() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut flakes = Flakes::new(4);
        flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng);
        flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng);
        flakes.active[0] = false;
        flakes.n -= 1;

        // Cursor sits at slot 2, so slot 0 is reused only after 2 and 3
        flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng);
        assert!(flakes.active[2]);
        assert!(!flakes.active[0]);
    }

    #[test]
    fn fall_speed_is_biased_and_bounded() {
        assert_eq!(fall_speed(12.0, 0.0), 12.0);
        assert_eq!(fall_speed(12.0, 1.0), 15.0);
        // Low base speeds hit the floor
        assert_eq!(fall_speed(0.0, 0.0), 3.0);
        // sqrt pushes the median draw past the midpoint of the range
        assert!(fall_speed(12.0, 0.25) == 13.5);
        assert!(fall_speed(12.0, 0.5) > 13.5);
    }

    #[test]
    fn apply_capacity_drops_highest_slots_first() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut flakes = Flakes::new(10);
        for _ in 0..10 {
            flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng);
        }

        flakes.apply_capacity(6);
        assert_eq!(flakes.active_count(), 6);
        assert!(flakes.active[..6].iter().all(|&a| a));
        assert!(flakes.active[6..10].iter().all(|&a| !a));
        assert!(!flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng));

        flakes.apply_capacity(10);
        assert!(flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng));
    }

    #[test]
    fn token_bucket_spawns_at_rate() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut flakes = Flakes::new(100);

        // Ramp disabled: only the bucket adds flakes. 0.5/s for 10s = 5.
        for _ in 0..600 {
            flakes.replenish(0.0, 0.5, 1.0 / 60.0, BOUNDS, 12.0, 7, &mut rng);
        }
        assert!((4..=5).contains(&flakes.active_count()));
    }

    #[test]
    fn ramp_targets_fraction_of_limit() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut flakes = Flakes::new(200);
        flakes.replenish(0.5, 0.0, 0.0, BOUNDS, 12.0, 7, &mut rng);
        assert_eq!(flakes.active_count(), 100);
        flakes.replenish(1.0, 0.0, 0.0, BOUNDS, 12.0, 7, &mut rng);
        assert_eq!(flakes.active_count(), 200);
    }

    #[test]
    fn views_cover_only_active_slots() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut flakes = Flakes::new(8);
        for _ in 0..5 {
            flakes.try_spawn_one(BOUNDS, 12.0, 7, &mut rng);
        }
        assert_eq!(flakes.views().count(), 5);
    }
}
