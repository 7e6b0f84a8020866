//! Algorithms for fitting piecewise linear models over sorted `(key, rank)` pairs, the building
//! block of a PGM-style learned index.
//!
//! Every model produced here approximates the rank of each point it was fitted on within its
//! [`ApproxPos`] window, i.e. `lo <= rank < hi`.

mod key;
mod model;
mod point;
mod segmentation;

pub use key::SegmentKey;
pub use model::{ApproxPos, LinearModel};
pub use segmentation::{OptimalSegmentation, Segmentation, SimpleSegmentation};
