//! Cloth data model: frames, points, springs, grid topology and collision meshes.

pub mod mesh;
pub mod topology;
pub mod types;

pub use mesh::{Aabb, Triangle, TriangleMesh};
pub use topology::ClothTopology;
pub use types::{ClothPoint, Spring, SpringKind, Transform};
