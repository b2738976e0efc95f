//! Collision resolution against rigid primitives and the static mesh.
//!
//! Resolvers operate on the predicted-position buffer (cloth-local space),
//! skip fixed points and mutate positions in place. [`CollisionPipeline`]
//! owns the configured colliders and runs them in a fixed order.

pub mod box_collider;
pub mod ground;
pub mod mesh;
pub mod pipeline;
pub mod sphere;

pub use box_collider::BoxCollider;
pub use ground::GroundPlane;
pub use mesh::MeshCollider;
pub use pipeline::{CollisionPipeline, CollisionReport};
pub use sphere::SphereCollider;

use glam::Vec3;

use crate::core::types::{ClothPoint, Transform};

/// Frame information shared by every resolver for one step.
#[derive(Debug, Clone, Copy)]
pub struct CollisionContext<'a> {
    pub cloth_transform: &'a Transform,
    /// Freeze points at their corrected position on contact.
    pub stick: bool,
}

impl CollisionContext<'_> {
    /// Writes a corrected world position back into the cloth-local buffer,
    /// freezing the point there when sticky contact is enabled.
    pub(crate) fn commit(&self, world: Vec3, predicted: &mut Vec3, point: &mut ClothPoint) {
        *predicted = self.cloth_transform.inverse_transform_point(world);
        if self.stick {
            point.position = *predicted;
            point.freeze();
        }
    }
}

/// A collider that corrects predicted cloth positions.
pub trait PredictedCollider {
    /// Returns the number of points corrected this step.
    fn resolve(
        &mut self,
        ctx: &CollisionContext<'_>,
        predicted: &mut [Vec3],
        points: &mut [ClothPoint],
    ) -> usize;
}
