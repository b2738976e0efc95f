use log::debug;

use crate::{
    config::{BVH_MAX_DEPTH, BVH_MAX_LEAF_TRIANGLES},
    core::mesh::{Aabb, Triangle, TriangleMesh},
};

/// Hierarchical BVH node. Internal nodes always own two children and leaves
/// always own at least one triangle.
#[derive(Debug, Clone)]
pub enum BvhNode {
    Internal {
        bounds: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
    Leaf {
        bounds: Aabb,
        triangles: Vec<Triangle>,
    },
}

impl BvhNode {
    pub fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Internal { bounds, .. } | BvhNode::Leaf { bounds, .. } => bounds,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Total nodes in this subtree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
            BvhNode::Leaf { .. } => 1,
        }
    }

    /// Total triangles stored in the leaves of this subtree.
    pub fn triangle_count(&self) -> usize {
        match self {
            BvhNode::Internal { left, right, .. } => left.triangle_count() + right.triangle_count(),
            BvhNode::Leaf { triangles, .. } => triangles.len(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
            BvhNode::Leaf { .. } => 1,
        }
    }
}

/// Top-down builder splitting at the centroid median of the longest axis.
#[derive(Debug, Clone)]
pub struct BvhBuilder {
    pub max_leaf_triangles: usize,
    pub max_depth: u32,
}

impl Default for BvhBuilder {
    fn default() -> Self {
        Self {
            max_leaf_triangles: BVH_MAX_LEAF_TRIANGLES,
            max_depth: BVH_MAX_DEPTH,
        }
    }
}

impl BvhBuilder {
    pub fn new(max_leaf_triangles: usize, max_depth: u32) -> Self {
        Self {
            max_leaf_triangles: max_leaf_triangles.max(1),
            max_depth,
        }
    }

    /// Builds a hierarchy over the mesh triangles. Returns `None` for an empty mesh.
    pub fn build(&self, mesh: &TriangleMesh) -> Option<BvhNode> {
        self.build_from_triangles(mesh.triangles.clone())
    }

    pub fn build_from_triangles(&self, triangles: Vec<Triangle>) -> Option<BvhNode> {
        if triangles.is_empty() {
            return None;
        }
        let root = self.build_node(triangles, 0);
        debug!(
            "bvh built: {} nodes, {} triangles, depth {}",
            root.node_count(),
            root.triangle_count(),
            root.depth()
        );
        Some(root)
    }

    fn build_node(&self, mut triangles: Vec<Triangle>, depth: u32) -> BvhNode {
        let bounds = triangles
            .iter()
            .fold(Aabb::empty(), |acc, tri| acc.merge(&tri.bounds()));

        if triangles.len() <= self.max_leaf_triangles || depth >= self.max_depth {
            return BvhNode::Leaf { bounds, triangles };
        }

        let centroid_bounds = Aabb::from_points(
            &triangles.iter().map(Triangle::centroid).collect::<Vec<_>>(),
        );
        let axis = centroid_bounds.longest_axis();
        triangles.sort_by(|a, b| a.centroid()[axis].total_cmp(&b.centroid()[axis]));

        let right_half = triangles.split_off(triangles.len() / 2);
        BvhNode::Internal {
            bounds,
            left: Box::new(self.build_node(triangles, depth + 1)),
            right: Box::new(self.build_node(right_half, depth + 1)),
        }
    }
}
