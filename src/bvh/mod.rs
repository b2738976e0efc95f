//! Bounding volume hierarchy over the static collision mesh.
//!
//! The hierarchy is built once as a boxed tree ([`BvhNode`]) and then
//! flattened pre-order into index-addressed arrays ([`FlatBvh`]) that can be
//! handed to a collision kernel unchanged.

pub mod build;
pub mod flatten;

pub use build::{BvhBuilder, BvhNode};
pub use flatten::{FlatBvh, FlatNode, FlatTriangle, NO_CHILD};
