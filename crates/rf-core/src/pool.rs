//! Fixed-size scene slot pool.
//!
//! Backs `InstanceFactory` with a pre-sized set of reusable scene slots:
//! acquiring activates an inactive slot, releasing deactivates it. Useful
//! when the engine collaborator pre-instantiates its scene objects instead
//! of churning allocations per candidate.

use crate::catalog::RoomTemplate;
use crate::error::FactoryError;
use crate::instance::{InstanceFactory, Pose, SceneHandle};

/// A pool of reusable scene slots, identified by their index.
#[derive(Debug, Clone)]
pub struct ScenePool {
    active: Vec<bool>,
}

impl ScenePool {
    /// Create a pool with `capacity` pre-initialized inactive slots
    pub fn new(capacity: usize) -> Self {
        Self {
            active: vec![false; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.active.len()
    }

    /// Number of slots currently checked out
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    /// Activate and return the first inactive slot, or None when exhausted
    pub fn acquire(&mut self) -> Option<SceneHandle> {
        for (i, active) in self.active.iter_mut().enumerate() {
            if !*active {
                *active = true;
                return Some(SceneHandle(i as u64));
            }
        }
        None
    }

    /// Deactivate a slot so it can be handed out again.
    ///
    /// Unknown handles are ignored; releasing twice is a no-op.
    pub fn release(&mut self, handle: SceneHandle) {
        if let Some(active) = self.active.get_mut(handle.0 as usize) {
            *active = false;
        }
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        self.active.fill(false);
    }
}

/// `InstanceFactory` backed by a `ScenePool`.
///
/// Pool exhaustion is a factory failure and aborts generation, matching the
/// contract that collaborator failures are fatal.
#[derive(Debug)]
pub struct PooledFactory {
    pool: ScenePool,
}

impl PooledFactory {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: ScenePool::new(capacity),
        }
    }

    pub fn pool(&self) -> &ScenePool {
        &self.pool
    }
}

impl InstanceFactory for PooledFactory {
    fn materialize(
        &mut self,
        _template: &RoomTemplate,
        _pose: Pose,
    ) -> Result<SceneHandle, FactoryError> {
        self.pool.acquire().ok_or(FactoryError::PoolExhausted {
            capacity: self.pool.capacity(),
        })
    }

    fn release(&mut self, handle: SceneHandle) {
        self.pool.release(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Obb, Turn, Vec3};

    fn template() -> RoomTemplate {
        RoomTemplate::new(
            "t",
            Obb::axis_aligned(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)),
            vec![],
        )
    }

    #[test]
    fn test_acquire_release_cycle() {
        let mut pool = ScenePool::new(2);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.active_count(), 2);
        assert!(pool.acquire().is_none());

        pool.release(a);
        assert_eq!(pool.active_count(), 1);
        // Slot is reused after release.
        assert_eq!(pool.acquire(), Some(a));
    }

    #[test]
    fn test_release_unknown_ignored() {
        let mut pool = ScenePool::new(1);
        pool.release(SceneHandle(99));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut pool = ScenePool::new(3);
        pool.acquire();
        pool.acquire();
        pool.clear();
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_pooled_factory_exhaustion() {
        let mut factory = PooledFactory::new(1);
        let pose = Pose::new(Vec3::ZERO, Turn::R0);
        let template = template();

        let handle = factory.materialize(&template, pose).unwrap();
        let err = factory.materialize(&template, pose).unwrap_err();
        assert_eq!(err, FactoryError::PoolExhausted { capacity: 1 });

        factory.release(handle);
        assert!(factory.materialize(&template, pose).is_ok());
    }
}
