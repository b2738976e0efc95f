use std::{fmt, sync::Arc};

use glam::Vec3;
use log::debug;

use super::{CollisionContext, PredictedCollider};
use crate::{
    bvh::{BvhBuilder, FlatBvh},
    config::{MESH_BOUNDS_MARGIN, MIN_CONTACT_NORMAL_SQ},
    core::{
        mesh::{Aabb, TriangleMesh},
        types::ClothPoint,
    },
    error::{ClothError, Result},
    gpu::MeshCollisionKernel,
};

/// Static triangle mesh resolved through a [`MeshCollisionKernel`].
///
/// Each step the points whose world position falls inside the expanded mesh
/// bounds are gathered, dispatched in one batch and written back by index.
/// Without sticky contact, points that come back with no contact normal are
/// left as predicted.
pub struct MeshCollider {
    bvh: Arc<FlatBvh>,
    candidate_bounds: Aabb,
    kernel: Arc<dyn MeshCollisionKernel>,

    active_indices: Vec<usize>,
    active_points: Vec<Vec3>,
    contact_normals: Vec<Vec3>,
    last_dispatch: usize,
}

impl fmt::Debug for MeshCollider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshCollider")
            .field("nodes", &self.bvh.node_count())
            .field("triangles", &self.bvh.triangle_count())
            .field("kernel", &self.kernel.name())
            .field("last_dispatch", &self.last_dispatch)
            .finish()
    }
}

impl MeshCollider {
    /// Builds and flattens the BVH for `mesh` (already in world space).
    pub fn new(mesh: &TriangleMesh, kernel: Arc<dyn MeshCollisionKernel>) -> Result<Self> {
        let root = BvhBuilder::default()
            .build(mesh)
            .ok_or(ClothError::EmptyMesh)?;
        let bvh = FlatBvh::flatten(Some(&root));
        debug!(
            "mesh collider ready: {} triangles, {} nodes, kernel {}",
            bvh.triangle_count(),
            bvh.node_count(),
            kernel.name()
        );
        Self::from_flat(Arc::new(bvh), kernel)
    }

    /// Wraps a BVH that was flattened elsewhere, possibly shared between cloths.
    pub fn from_flat(bvh: Arc<FlatBvh>, kernel: Arc<dyn MeshCollisionKernel>) -> Result<Self> {
        let bounds = bvh.bounds().ok_or(ClothError::EmptyMesh)?;
        Ok(Self {
            bvh,
            candidate_bounds: bounds.expanded(MESH_BOUNDS_MARGIN),
            kernel,
            active_indices: Vec::new(),
            active_points: Vec::new(),
            contact_normals: Vec::new(),
            last_dispatch: 0,
        })
    }

    pub fn bvh(&self) -> &Arc<FlatBvh> {
        &self.bvh
    }

    pub fn kernel(&self) -> &Arc<dyn MeshCollisionKernel> {
        &self.kernel
    }

    /// World bounds a point must fall inside to be sent to the kernel.
    pub fn candidate_bounds(&self) -> Aabb {
        self.candidate_bounds
    }

    /// Number of points handed to the kernel by the last resolve.
    pub fn last_dispatch_count(&self) -> usize {
        self.last_dispatch
    }

    fn gather(&mut self, ctx: &CollisionContext<'_>, predicted: &[Vec3], points: &[ClothPoint]) {
        self.active_indices.clear();
        self.active_points.clear();
        for (i, (point, &local)) in points.iter().zip(predicted).enumerate() {
            if point.is_fixed {
                continue;
            }
            let world = ctx.cloth_transform.transform_point(local);
            if self.candidate_bounds.contains(world) {
                self.active_indices.push(i);
                self.active_points.push(world);
            }
        }
    }
}

impl PredictedCollider for MeshCollider {
    fn resolve(
        &mut self,
        ctx: &CollisionContext<'_>,
        predicted: &mut [Vec3],
        points: &mut [ClothPoint],
    ) -> usize {
        self.gather(ctx, predicted, points);
        self.last_dispatch = self.active_points.len();
        if self.active_points.is_empty() {
            return 0;
        }

        self.contact_normals.clear();
        self.contact_normals
            .resize(self.active_points.len(), Vec3::ZERO);
        self.kernel.dispatch(
            &self.bvh,
            &mut self.active_points,
            &mut self.contact_normals,
        );

        let mut corrected = 0;
        let results = self.active_points.iter().zip(&self.contact_normals);
        for (&i, (&world, normal)) in self.active_indices.iter().zip(results) {
            // Sticky mode freezes every dispatched point, touching or not.
            if !ctx.stick && normal.length_squared() < MIN_CONTACT_NORMAL_SQ {
                continue;
            }
            ctx.commit(world, &mut predicted[i], &mut points[i]);
            corrected += 1;
        }
        corrected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::mesh::Triangle, gpu::NoopKernel};

    fn floor_mesh() -> TriangleMesh {
        TriangleMesh::new(vec![
            Triangle::new(
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(-1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
            ),
            Triangle::new(
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, -1.0),
            ),
        ])
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = MeshCollider::new(&TriangleMesh::new(Vec::new()), Arc::new(NoopKernel)).unwrap_err();
        assert_eq!(err, ClothError::EmptyMesh);
    }

    #[test]
    fn only_points_near_the_mesh_are_dispatched() {
        let mut collider = MeshCollider::new(&floor_mesh(), Arc::new(NoopKernel)).unwrap();
        let transform = crate::core::types::Transform::default();
        let ctx = CollisionContext {
            cloth_transform: &transform,
            stick: false,
        };
        let mut predicted = vec![
            Vec3::new(0.0, 0.2, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.5, -0.1, 0.5),
        ];
        let mut points: Vec<ClothPoint> =
            predicted.iter().map(|&p| ClothPoint::new(p, 1.0)).collect();
        points[2].is_fixed = true;

        let corrected = collider.resolve(&ctx, &mut predicted, &mut points);

        assert_eq!(corrected, 0);
        assert_eq!(collider.last_dispatch_count(), 1);
        assert_eq!(predicted[0], Vec3::new(0.0, 0.2, 0.0));
    }

    #[test]
    fn sticky_mode_freezes_every_dispatched_point() {
        let mut collider = MeshCollider::new(&floor_mesh(), Arc::new(NoopKernel)).unwrap();
        let transform = crate::core::types::Transform::default();
        let ctx = CollisionContext {
            cloth_transform: &transform,
            stick: true,
        };
        let mut predicted = vec![Vec3::new(0.2, 0.3, 0.3), Vec3::new(0.0, 5.0, 0.0)];
        let mut points: Vec<ClothPoint> =
            predicted.iter().map(|&p| ClothPoint::new(p, 1.0)).collect();

        let corrected = collider.resolve(&ctx, &mut predicted, &mut points);

        assert_eq!(corrected, 1);
        assert!(points[0].is_fixed);
        assert_eq!(points[0].position, Vec3::new(0.2, 0.3, 0.3));
        assert!(!points[1].is_fixed);
    }
}
