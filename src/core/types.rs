use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Common math types re-exported for convenience.
pub use glam::Vec2;

/// Position, orientation, and non-uniform scale of a frame (cloth or collider).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::default()
        }
    }

    /// Maps a point from this frame into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * local)
    }

    /// Maps a world-space point into this frame.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        (self.rotation.inverse() * (world - self.position)) / self.scale
    }

    /// Rotates a world-space direction into this frame. Scale is ignored.
    pub fn inverse_transform_direction(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    /// Largest absolute scale component, used to scale radii.
    pub fn max_scale(&self) -> f32 {
        self.scale.abs().max_element()
    }
}

/// A simulated mass particle at one grid vertex, in cloth-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClothPoint {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Force accumulator, cleared by the integrators every step.
    pub force: Vec3,
    pub mass: f32,
    pub is_fixed: bool,
}

impl ClothPoint {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
            is_fixed: false,
        }
    }

    pub fn pinned(position: Vec3, mass: f32) -> Self {
        Self {
            is_fixed: true,
            ..Self::new(position, mass)
        }
    }

    /// Inverse mass used by constraint projection; fixed points weigh nothing.
    pub fn inverse_mass(&self) -> f32 {
        if self.is_fixed || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_fixed {
            return;
        }
        self.force += force;
    }

    /// Pins the point where it is and kills its motion.
    pub fn freeze(&mut self) {
        self.is_fixed = true;
        self.velocity = Vec3::ZERO;
        self.force = Vec3::ZERO;
    }
}

/// Spring categories derived from the grid adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringKind {
    /// 4-neighbour grid edges.
    Structural,
    /// Diagonal neighbours.
    Shear,
    /// Skip-one neighbours.
    Bend,
}

/// Distance link between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub index_a: usize,
    pub index_b: usize,
    /// Separation at construction time; never recomputed.
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Spring {
    pub fn new(index_a: usize, index_b: usize, rest_length: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            index_a,
            index_b,
            rest_length,
            stiffness,
            damping,
        }
    }
}
