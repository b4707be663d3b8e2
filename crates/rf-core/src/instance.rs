//! Room instance poses and the instance factory seam.
//!
//! The core never touches a real scene graph. Materializing and releasing
//! the external representation of a room instance goes through the
//! `InstanceFactory` capability, called exactly once per candidate built and
//! exactly once per candidate that is not committed.

use serde::{Deserialize, Serialize};

use crate::catalog::RoomTemplate;
use crate::error::FactoryError;
use crate::geom::{Turn, Vec3};

/// World-space rigid transform of a room instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub turn: Turn,
}

impl Pose {
    pub fn new(position: Vec3, turn: Turn) -> Self {
        Self { position, turn }
    }

    /// Map a template-local point into world space
    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.position + self.turn.apply(local)
    }

    /// Map a template-local direction into world space
    pub fn apply_dir(&self, local: Vec3) -> Vec3 {
        self.turn.apply(local)
    }
}

/// A template entrance socket resolved into world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSocket {
    pub position: Vec3,
    pub outward: Vec3,
}

/// Opaque identity of a room instance's external representation
/// (e.g. a scene object owned by the engine collaborator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneHandle(pub u64);

/// Capability to materialize and release room instance representations.
///
/// Supplied by a rendering/engine collaborator. The placement engine owns
/// every handle it receives until the instance is either committed into the
/// level tree or released back through this trait.
pub trait InstanceFactory {
    fn materialize(
        &mut self,
        template: &RoomTemplate,
        pose: Pose,
    ) -> Result<SceneHandle, FactoryError>;

    fn release(&mut self, handle: SceneHandle);
}

/// Headless factory handing out sequential handles.
///
/// Keeps materialize/release counts so tests can assert that no candidate
/// leaks past the recursion step that created it.
#[derive(Debug, Default)]
pub struct CountingFactory {
    next: u64,
    materialized: u64,
    released: u64,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn materialized(&self) -> u64 {
        self.materialized
    }

    pub fn released(&self) -> u64 {
        self.released
    }

    /// Handles currently live (materialized and not yet released)
    pub fn live(&self) -> u64 {
        self.materialized - self.released
    }
}

impl InstanceFactory for CountingFactory {
    fn materialize(
        &mut self,
        _template: &RoomTemplate,
        _pose: Pose,
    ) -> Result<SceneHandle, FactoryError> {
        let handle = SceneHandle(self.next);
        self.next += 1;
        self.materialized += 1;
        Ok(handle)
    }

    fn release(&mut self, _handle: SceneHandle) {
        self.released += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Obb;

    #[test]
    fn test_pose_apply() {
        let pose = Pose::new(Vec3::new(10.0, 0.0, 0.0), Turn::R180);
        assert_eq!(pose.apply(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(pose.apply_dir(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_counting_factory() {
        let template = RoomTemplate::new(
            "t",
            Obb::axis_aligned(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)),
            vec![],
        );
        let mut factory = CountingFactory::new();

        let a = factory
            .materialize(&template, Pose::new(Vec3::ZERO, Turn::R0))
            .unwrap();
        let b = factory
            .materialize(&template, Pose::new(Vec3::ZERO, Turn::R0))
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(factory.live(), 2);

        factory.release(a);
        assert_eq!(factory.materialized(), 2);
        assert_eq!(factory.released(), 1);
        assert_eq!(factory.live(), 1);
    }
}
