use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::types::Transform;
use crate::error::{ClothError, Result};

/// Axis-aligned bounding box used for mesh bounds and BVH nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::empty();
        for &p in points {
            bounds.extend(p);
        }
        bounds
    }

    /// Grows the box by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Squared distance from `point` to the box, zero when inside.
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        let clamped = point.clamp(self.min, self.max);
        (point - clamped).length_squared()
    }

    /// Index of the longest axis (0 = X, 1 = Y, 2 = Z).
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }
}

/// World-space triangle of the static collision mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&[self.v0, self.v1, self.v2])
    }

    /// Unit face normal following counter-clockwise winding, zero when degenerate.
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0).normalize_or_zero()
    }
}

/// Static collision mesh as a world-space triangle soup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
    pub bounds: Aabb,
}

impl TriangleMesh {
    /// Wraps triangles that are already in world space.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let mut bounds = Aabb::empty();
        for tri in &triangles {
            bounds.extend(tri.v0);
            bounds.extend(tri.v1);
            bounds.extend(tri.v2);
        }
        Self { triangles, bounds }
    }

    /// Cooks an indexed mesh into world-space triangles using the mesh's transform.
    pub fn from_indexed(
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        transform: &Transform,
    ) -> Result<Self> {
        if indices.is_empty() {
            return Err(ClothError::EmptyMesh);
        }

        let world: Vec<Vec3> = vertices
            .iter()
            .map(|&v| transform.transform_point(v))
            .collect();

        let mut triangles = Vec::with_capacity(indices.len());
        for tri in indices {
            let mut corners = [Vec3::ZERO; 3];
            for (corner, &index) in corners.iter_mut().zip(tri.iter()) {
                *corner = *world.get(index as usize).ok_or(ClothError::IndexOutOfRange {
                    index,
                    len: vertices.len(),
                })?;
            }
            triangles.push(Triangle::new(corners[0], corners[1], corners[2]));
        }

        Ok(Self::new(triangles))
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
