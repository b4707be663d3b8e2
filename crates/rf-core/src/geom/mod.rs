//! Geometry primitives for room placement.

mod obb;
mod turn;
mod vec;

pub use obb::{Obb, OverlapOracle, SatOverlap};
pub use turn::Turn;
pub use vec::Vec3;
