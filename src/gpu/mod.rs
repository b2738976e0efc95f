//! Boundary to the parallel mesh-collision kernel.
//!
//! The cloth side collects candidate points in world space, hands them to a
//! [`MeshCollisionKernel`] together with the flattened BVH, and reads back one
//! corrected position and one contact normal per point. Order is preserved and
//! a zero normal means "no contact".

pub mod cpu_backend;
pub use cpu_backend::CpuKernel;

use glam::Vec3;

use crate::bvh::FlatBvh;

/// Snapshot of the last kernel dispatch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KernelStats {
    pub dispatches: u64,
    pub last_point_count: usize,
    pub last_contact_count: usize,
}

/// Trait implemented by backends that resolve points against the flattened mesh.
///
/// `points` are overwritten in place with corrected world positions and
/// `normals` (same length) receive the contact normal or `Vec3::ZERO`.
/// Implementations must accept empty inputs.
pub trait MeshCollisionKernel: Send + Sync {
    fn name(&self) -> &str;

    fn dispatch(&self, bvh: &FlatBvh, points: &mut [Vec3], normals: &mut [Vec3]);

    /// Optional dispatch statistics.
    fn stats(&self) -> KernelStats {
        KernelStats::default()
    }
}

/// Kernel that reports no contacts and leaves every point untouched.
#[derive(Debug, Default)]
pub struct NoopKernel;

impl NoopKernel {
    pub fn new() -> Self {
        Self
    }
}

impl MeshCollisionKernel for NoopKernel {
    fn name(&self) -> &str {
        "noop"
    }

    fn dispatch(&self, _bvh: &FlatBvh, _points: &mut [Vec3], normals: &mut [Vec3]) {
        normals.fill(Vec3::ZERO);
    }
}
