use glam::Vec3;
use parking_lot::Mutex;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{KernelStats, MeshCollisionKernel};
use crate::{
    bvh::{FlatBvh, FlatNode, FlatTriangle},
    config::KERNEL_CONTACT_OFFSET,
    core::mesh::Triangle,
    utils::math::closest_point_on_triangle,
};

/// Reference kernel running on the CPU.
///
/// For each point it finds the closest triangle through the BVH. Points lying
/// behind the triangle face, or closer than `contact_offset` in front of it,
/// are moved to `closest + normal * contact_offset`.
#[derive(Debug)]
pub struct CpuKernel {
    pub contact_offset: f32,
    stats: Mutex<KernelStats>,
}

impl Default for CpuKernel {
    fn default() -> Self {
        Self::new(KERNEL_CONTACT_OFFSET)
    }
}

impl CpuKernel {
    pub fn new(contact_offset: f32) -> Self {
        Self {
            contact_offset: contact_offset.max(0.0),
            stats: Mutex::new(KernelStats::default()),
        }
    }
}

impl MeshCollisionKernel for CpuKernel {
    fn name(&self) -> &str {
        "cpu-bvh"
    }

    fn dispatch(&self, bvh: &FlatBvh, points: &mut [Vec3], normals: &mut [Vec3]) {
        normals.fill(Vec3::ZERO);
        if points.is_empty() || bvh.is_empty() {
            return;
        }

        let nodes = bvh.nodes();
        let triangles = bvh.triangles();
        let offset = self.contact_offset;

        let project = |(point, normal): (&mut Vec3, &mut Vec3)| -> usize {
            match project_point(nodes, triangles, *point, offset) {
                Some((corrected, contact_normal)) => {
                    *point = corrected;
                    *normal = contact_normal;
                    1
                }
                None => 0,
            }
        };

        #[cfg(feature = "parallel")]
        let contacts: usize = points
            .par_iter_mut()
            .zip(normals.par_iter_mut())
            .map(project)
            .sum();
        #[cfg(not(feature = "parallel"))]
        let contacts: usize = points
            .iter_mut()
            .zip(normals.iter_mut())
            .map(project)
            .sum();

        let mut stats = self.stats.lock();
        stats.dispatches += 1;
        stats.last_point_count = points.len();
        stats.last_contact_count = contacts;
    }

    fn stats(&self) -> KernelStats {
        *self.stats.lock()
    }
}

/// Closest-triangle projection for one point.
fn project_point(
    nodes: &[FlatNode],
    triangles: &[FlatTriangle],
    point: Vec3,
    offset: f32,
) -> Option<(Vec3, Vec3)> {
    let mut best_distance_sq = f32::INFINITY;
    let mut best: Option<(Vec3, Vec3)> = None;
    let mut stack: Vec<usize> = vec![0];

    while let Some(index) = stack.pop() {
        let Some(node) = nodes.get(index) else {
            continue;
        };
        if node.bounds().distance_squared(point) >= best_distance_sq {
            continue;
        }

        if node.is_leaf() {
            for flat in triangles.get(node.triangle_range()).unwrap_or(&[]) {
                let tri = Triangle::from(*flat);
                let closest = closest_point_on_triangle(point, tri.v0, tri.v1, tri.v2);
                let distance_sq = (point - closest).length_squared();
                if distance_sq < best_distance_sq {
                    best_distance_sq = distance_sq;
                    best = Some((closest, tri.normal()));
                }
            }
        } else {
            for child in [node.left_child, node.right_child] {
                if child >= 0 {
                    stack.push(child as usize);
                }
            }
        }
    }

    let (closest, normal) = best?;
    if normal == Vec3::ZERO {
        return None;
    }
    let signed_distance = (point - closest).dot(normal);
    if signed_distance >= offset {
        return None;
    }
    Some((closest + normal * offset, normal))
}
