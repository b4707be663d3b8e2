//! Oriented bounding boxes and the overlap oracle.
//!
//! Every volume this system handles is a box rotated about the vertical axis
//! only (room templates carry a local yaw, placement adds quarter turns), so
//! the separating-axis test reduces to five candidate axes: the vertical
//! axis plus the two horizontal axes of each box.

use serde::{Deserialize, Serialize};

use crate::error::OverlapError;

use super::{Turn, Vec3};

/// A bounding box oriented by a rotation about the vertical axis.
///
/// Stored as a center, half-extents, and the two horizontal unit axes of the
/// box frame. The axes are kept explicitly so quarter-turn placement stays
/// exact instead of round-tripping through angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    /// Box center
    pub center: Vec3,
    /// Half-extent along each box axis
    pub half: Vec3,
    /// Unit axis of the box's local X, always horizontal
    pub axis_u: Vec3,
    /// Unit axis of the box's local Z, always horizontal
    pub axis_w: Vec3,
}

impl Obb {
    /// An axis-aligned box
    pub fn axis_aligned(center: Vec3, half: Vec3) -> Self {
        Self {
            center,
            half,
            axis_u: Vec3::new(1.0, 0.0, 0.0),
            axis_w: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// A box rotated about the vertical axis by `yaw` radians
    pub fn with_yaw(center: Vec3, half: Vec3, yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        Self {
            center,
            half,
            axis_u: Vec3::new(cos, 0.0, -sin),
            axis_w: Vec3::new(sin, 0.0, cos),
        }
    }

    /// This box rotated by a quarter turn about the origin of its frame
    pub fn rotated(&self, turn: Turn) -> Self {
        Self {
            center: turn.apply(self.center),
            half: self.half,
            axis_u: turn.apply(self.axis_u),
            axis_w: turn.apply(self.axis_w),
        }
    }

    /// This box translated by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            ..*self
        }
    }

    /// Projection radius of this box onto a unit axis
    fn radius_along(&self, axis: &Vec3) -> f32 {
        axis.dot(&self.axis_u).abs() * self.half.x
            + axis.dot(&Vec3::UP).abs() * self.half.y
            + axis.dot(&self.axis_w).abs() * self.half.z
    }
}

/// Capability for measuring spatial overlap between two oriented volumes.
///
/// Returns a non-negative penetration depth; 0 means disjoint or merely
/// touching. The placement engine treats the oracle as authoritative and
/// side-effect-free. The fallible signature lets an external physics
/// collaborator surface its failures; they abort generation.
pub trait OverlapOracle {
    fn penetration(&self, a: &Obb, b: &Obb) -> Result<f32, OverlapError>;
}

/// Separating-axis overlap test for vertically-oriented boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SatOverlap;

impl OverlapOracle for SatOverlap {
    fn penetration(&self, a: &Obb, b: &Obb) -> Result<f32, OverlapError> {
        let axes = [Vec3::UP, a.axis_u, a.axis_w, b.axis_u, b.axis_w];
        let delta = b.center - a.center;

        let mut depth = f32::INFINITY;
        for axis in &axes {
            let overlap = a.radius_along(axis) + b.radius_along(axis) - delta.dot(axis).abs();
            if overlap <= 0.0 {
                // Separated (or exactly touching) along this axis.
                return Ok(0.0);
            }
            depth = depth.min(overlap);
        }
        Ok(depth)
    }
}
