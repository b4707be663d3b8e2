//! Error types for catalog construction and level generation.
//!
//! Recoverable conditions (a dead-end entrance, an exhausted repeat window,
//! a revisited socket) are not errors; only collaborator failures and
//! invalid inputs surface here.

use thiserror::Error;

/// Catalog construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("room catalog has no templates")]
    Empty,
}

/// Instance factory failures
///
/// Raised by the collaborator that materializes scene objects for room
/// instances. Always fatal to the generation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    #[error("scene pool exhausted after {capacity} instances")]
    PoolExhausted { capacity: usize },

    #[error("instance factory failed: {reason}")]
    Failed { reason: String },
}

/// Overlap oracle failures
///
/// The in-repo separating-axis oracle never fails; this exists so an
/// external physics collaborator can abort generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlapError {
    #[error("overlap oracle failed: {reason}")]
    Failed { reason: String },
}

/// Fatal generation errors
///
/// A partial level produced by a failed run is not guaranteed consistent;
/// the caller should discard it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Overlap(#[from] OverlapError),

    #[error("unknown template id {0}")]
    UnknownTemplate(u32),
}
