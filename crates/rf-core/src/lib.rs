//! rf-core: room placement for roomforge
//!
//! Assembles a connected level out of authored room templates by recursively
//! attaching pieces at entrance sockets and rejecting placements that
//! overlap committed rooms. The crate is pure and synchronous: randomness,
//! overlap testing, and scene-object lifecycle all come in through
//! explicitly passed collaborators, so a run is reproducible from its seed.

pub mod candidate;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod geom;
pub mod instance;
pub mod level;
pub mod pool;

pub use candidate::Candidate;
pub use catalog::{EntranceSocket, RoomCatalog, RoomTemplate, TemplateId};
pub use engine::{generate, GenerationConfig, DEFAULT_OVERLAP_TOLERANCE};
pub use error::{CatalogError, FactoryError, GenerateError, OverlapError};
pub use geom::{Obb, OverlapOracle, SatOverlap, Turn, Vec3};
pub use instance::{CountingFactory, InstanceFactory, Pose, SceneHandle, WorldSocket};
pub use level::{
    Connection, EntranceRef, GenerationWarning, LevelTree, PlacedRoom, RoomId,
};
pub use pool::{PooledFactory, ScenePool};
pub use rf_rng::GenRng;
