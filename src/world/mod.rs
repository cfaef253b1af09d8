// world/ - Static scenery
//
// Decorative props pinned to the bottom edge. Placed once per surface size,
// never moved by the simulation.

mod props;

pub use props::*;
