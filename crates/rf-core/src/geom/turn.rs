//! Quarter-turn rotations about the vertical axis.
//!
//! Placement never rotates a room freely: candidates are tried at discrete
//! 90-degree steps only. Applying a turn is an exact component swap, so no
//! trigonometric error accumulates across deep placement chains.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::Vec3;

/// A rotation of `step * 90` degrees about the vertical (Y) axis,
/// counterclockwise when viewed from above.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Turn {
    /// No rotation
    #[default]
    R0 = 0,
    /// 90 degrees
    R90 = 1,
    /// 180 degrees
    R180 = 2,
    /// 270 degrees
    R270 = 3,
}

impl Turn {
    /// All turns in step order
    pub const ALL: [Turn; 4] = [Turn::R0, Turn::R90, Turn::R180, Turn::R270];

    /// The rotation step count (0..=3)
    pub fn step(self) -> u8 {
        self as u8
    }

    /// Rotate a vector about the Y axis by this turn
    pub fn apply(self, v: Vec3) -> Vec3 {
        match self {
            Turn::R0 => v,
            Turn::R90 => Vec3::new(v.z, v.y, -v.x),
            Turn::R180 => Vec3::new(-v.x, v.y, -v.z),
            Turn::R270 => Vec3::new(-v.z, v.y, v.x),
        }
    }
}
