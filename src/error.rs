//! Error types raised while configuring a cloth or its collaborators.
//!
//! Stepping never fails; only setup paths return [`ClothError`].

use thiserror::Error;

/// Errors produced by configuration entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClothError {
    /// The vertex grid does not hold `(width + 1) * (height + 1)` entries.
    #[error("grid size mismatch: expected {expected} vertices, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },

    /// The grid dimensions overflow the addressable point count.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Point mass must be finite and strictly positive.
    #[error("invalid point mass {0}, must be > 0")]
    InvalidMass(f32),

    /// A collision mesh without triangles was supplied.
    #[error("collision mesh has no triangles")]
    EmptyMesh,

    /// A triangle references a vertex that does not exist.
    #[error("vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: u32, len: usize },
}

/// Convenient Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ClothError>;
