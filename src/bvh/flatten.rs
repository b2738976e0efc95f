use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::build::BvhNode;
use crate::core::mesh::{Aabb, Triangle};

/// Child index sentinel marking a leaf.
pub const NO_CHILD: i32 = -1;

/// Kernel-layout BVH node (40 bytes, tightly packed).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct FlatNode {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub left_child: i32,
    pub right_child: i32,
    pub start_triangle: i32,
    pub triangle_count: i32,
}

impl FlatNode {
    pub fn is_leaf(&self) -> bool {
        self.left_child == NO_CHILD && self.right_child == NO_CHILD
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.bounds_min, self.bounds_max)
    }

    /// Range into [`FlatBvh::triangles`] covered by a leaf.
    pub fn triangle_range(&self) -> std::ops::Range<usize> {
        let start = self.start_triangle.max(0) as usize;
        start..start + self.triangle_count.max(0) as usize
    }
}

/// Kernel-layout triangle (36 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct FlatTriangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl From<&Triangle> for FlatTriangle {
    fn from(tri: &Triangle) -> Self {
        Self {
            v0: tri.v0,
            v1: tri.v1,
            v2: tri.v2,
        }
    }
}

impl From<FlatTriangle> for Triangle {
    fn from(tri: FlatTriangle) -> Self {
        Triangle::new(tri.v0, tri.v1, tri.v2)
    }
}

/// Pre-order flattened BVH. Node 0 is the root and every parent precedes its children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatBvh {
    nodes: Vec<FlatNode>,
    triangles: Vec<FlatTriangle>,
}

impl FlatBvh {
    /// Flattens a hierarchy. A missing root yields empty arrays.
    pub fn flatten(root: Option<&BvhNode>) -> Self {
        let mut flat = Self::default();
        if let Some(root) = root {
            flat.nodes.reserve(root.node_count());
            flat.triangles.reserve(root.triangle_count());
            flat.flatten_node(root);
        }
        flat
    }

    fn flatten_node(&mut self, node: &BvhNode) -> i32 {
        let index = self.nodes.len();
        let bounds = node.bounds();

        // Reserve the slot first so children land after their parent.
        self.nodes.push(FlatNode {
            bounds_min: bounds.min,
            bounds_max: bounds.max,
            left_child: NO_CHILD,
            right_child: NO_CHILD,
            start_triangle: self.triangles.len() as i32,
            triangle_count: 0,
        });

        match node {
            BvhNode::Leaf { triangles, .. } => {
                self.triangles.extend(triangles.iter().map(FlatTriangle::from));
                self.nodes[index].triangle_count = triangles.len() as i32;
            }
            BvhNode::Internal { left, right, .. } => {
                let left_index = self.flatten_node(left);
                let right_index = self.flatten_node(right);
                let flat = &mut self.nodes[index];
                flat.left_child = left_index;
                flat.right_child = right_index;
            }
        }

        index as i32
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    pub fn triangles(&self) -> &[FlatTriangle] {
        &self.triangles
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root bounds, if any.
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(FlatNode::bounds)
    }

    /// Raw node bytes ready for upload.
    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Raw triangle bytes ready for upload.
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}
