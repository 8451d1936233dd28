//! Constructive heuristics for building initial shift routes.
//!
//! - [`nearest_neighbor`] — Per-shift greedy nearest-neighbor routes under the shift cap, O(n²)

mod nearest_neighbor;

pub use nearest_neighbor::nearest_neighbor;
