use std::sync::Arc;

use glam::Vec3;
use log::{trace, warn};

use super::{
    BoxCollider, CollisionContext, GroundPlane, MeshCollider, PredictedCollider, SphereCollider,
};
use crate::{
    core::{
        mesh::TriangleMesh,
        types::{ClothPoint, Transform},
    },
    gpu::MeshCollisionKernel,
};

/// Corrections made by one pass of the pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    pub sphere_contacts: usize,
    pub box_contacts: usize,
    pub mesh_contacts: usize,
    pub ground_contacts: usize,
    /// Points handed to the mesh kernel.
    pub kernel_points: usize,
}

impl CollisionReport {
    pub fn total_contacts(&self) -> usize {
        self.sphere_contacts + self.box_contacts + self.mesh_contacts + self.ground_contacts
    }
}

/// The colliders attached to one cloth, resolved sphere, box, mesh, then ground.
///
/// Later resolvers see the corrections of earlier ones.
#[derive(Debug, Default)]
pub struct CollisionPipeline {
    pub sphere: Option<SphereCollider>,
    pub cuboid: Option<BoxCollider>,
    pub mesh: Option<MeshCollider>,
    pub ground: Option<GroundPlane>,
    stick_to_mesh: bool,
}

impl CollisionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sphere(mut self, sphere: SphereCollider) -> Self {
        self.sphere = Some(sphere);
        self
    }

    pub fn with_box(mut self, cuboid: BoxCollider) -> Self {
        self.cuboid = Some(cuboid);
        self
    }

    pub fn with_mesh(mut self, mesh: MeshCollider) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_ground(mut self, ground: GroundPlane) -> Self {
        self.ground = Some(ground);
        self
    }

    /// Builds a mesh collider for `mesh`. On failure the mesh collider is
    /// disabled with a warning and `false` is returned.
    pub fn attach_mesh(&mut self, mesh: &TriangleMesh, kernel: Arc<dyn MeshCollisionKernel>) -> bool {
        match MeshCollider::new(mesh, kernel) {
            Ok(collider) => {
                self.mesh = Some(collider);
                true
            }
            Err(err) => {
                warn!("mesh collision disabled: {err}");
                self.mesh = None;
                false
            }
        }
    }

    /// When set, points touching the sphere or box freeze where they land, as
    /// does every point the mesh collider hands to its kernel.
    pub fn stick_to_mesh(&self) -> bool {
        self.stick_to_mesh
    }

    pub fn set_stick_to_mesh(&mut self, stick: bool) {
        self.stick_to_mesh = stick;
    }

    pub fn is_empty(&self) -> bool {
        self.sphere.is_none() && self.cuboid.is_none() && self.mesh.is_none() && self.ground.is_none()
    }

    /// Corrects `predicted` (cloth-local) against every configured collider.
    pub fn resolve(
        &mut self,
        cloth_transform: &Transform,
        predicted: &mut [Vec3],
        points: &mut [ClothPoint],
    ) -> CollisionReport {
        let ctx = CollisionContext {
            cloth_transform,
            stick: self.stick_to_mesh,
        };
        let mut report = CollisionReport::default();

        if let Some(sphere) = self.sphere.as_mut() {
            report.sphere_contacts = sphere.resolve(&ctx, predicted, points);
        }
        if let Some(cuboid) = self.cuboid.as_mut() {
            report.box_contacts = cuboid.resolve(&ctx, predicted, points);
        }
        if let Some(mesh) = self.mesh.as_mut() {
            report.mesh_contacts = mesh.resolve(&ctx, predicted, points);
            report.kernel_points = mesh.last_dispatch_count();
        }
        if let Some(ground) = self.ground.as_mut() {
            report.ground_contacts = ground.resolve(&ctx, predicted, points);
        }

        trace!("collisions resolved: {report:?}");
        report
    }
}
