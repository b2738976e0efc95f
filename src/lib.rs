//! Drapery – mass-spring cloth simulation for Rust.
//!
//! A cloth is a regular vertex grid turned into point masses joined by
//! structural, shear and bend springs. It is advanced by one of three
//! interchangeable integrators (semi-implicit Euler, position Verlet or
//! position-based dynamics) and, under PBD, resolved against spheres, boxes,
//! a ground plane and static triangle meshes. Mesh contacts go through a
//! flattened BVH handed to a [`MeshCollisionKernel`].

pub mod bvh;
pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod gpu;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec2, Vec3};

pub use bvh::{BvhBuilder, BvhNode, FlatBvh, FlatNode, FlatTriangle};
pub use collision::{
    BoxCollider, CollisionPipeline, CollisionReport, GroundPlane, MeshCollider, SphereCollider,
};
pub use config::{ClothParams, IntegratorKind, WindSettings};
pub use core::{
    mesh::{Aabb, Triangle, TriangleMesh},
    topology::ClothTopology,
    types::{ClothPoint, Spring, SpringKind, Transform},
};
pub use dynamics::{
    integrator::Integrator,
    pbd::StickState,
    wind::{UniformWind, WindField, WindMap},
};
pub use error::{ClothError, Result};
pub use gpu::{CpuKernel, KernelStats, MeshCollisionKernel, NoopKernel};
pub use utils::profiling::StepProfiler;
pub use world::ClothSolver;
