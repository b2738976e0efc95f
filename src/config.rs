//! Global configuration constants and tunable parameters for the Drapery cloth engine.

use serde::{Deserialize, Serialize};

/// Default gravity vector applied in world space (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Largest sub-step taken by the force-based integrators (in seconds).
pub const MAX_SUBSTEP_DT: f32 = 1.0 / 90.0;

/// Upper bound on sub-steps per `integrate` call. Remaining time is dropped.
pub const MAX_SUBSTEPS: u32 = 5;

/// Constraint projection sweeps per PBD step.
pub const PBD_SOLVER_ITERATIONS: u32 = 8;

/// Stiffness that maps to a full (k = 1) constraint correction per sweep.
pub const PBD_STIFFNESS_SCALE: f32 = 1200.0;

/// Rate used to derive the PBD velocity decay: `exp(-damping * rate)`.
pub const PBD_DAMPING_RATE: f32 = 0.2;

/// Velocity decay applied by the semi-implicit Euler integrator after each sub-step.
pub const EULER_VELOCITY_DECAY: f32 = 0.82;

/// History decay of the position Verlet integrator.
pub const VERLET_DECAY: f32 = 0.98;

/// Bend springs are softer than structural and shear springs by this factor.
pub const BEND_STIFFNESS_SCALE: f32 = 0.6;

/// Surface offset used when projecting points out of a sphere.
pub const SPHERE_MARGIN: f32 = 0.005;

/// Surface offset used when pushing points out of a box.
pub const BOX_MARGIN: f32 = 0.00001;

/// Height above the ground plane at which points are held.
pub const GROUND_MARGIN: f32 = 0.32;

/// Expansion of the collision mesh bounds used to select kernel candidates.
pub const MESH_BOUNDS_MARGIN: f32 = 0.5;

/// Contact normals shorter than this (squared) are treated as "no contact".
pub const MIN_CONTACT_NORMAL_SQ: f32 = 1e-8;

/// Downward speed given to points released from sticky contact.
pub const STICKY_RELEASE_KICK: f32 = 0.2;

/// Exponent shaping the wind gust response.
pub const WIND_EXPONENT: f32 = 1.8;

/// Maximum triangles stored in a BVH leaf.
pub const BVH_MAX_LEAF_TRIANGLES: usize = 4;

/// Maximum depth of the BVH builder before it forces a leaf.
pub const BVH_MAX_DEPTH: u32 = 24;

/// Distance the CPU kernel keeps points away from the mesh surface.
pub const KERNEL_CONTACT_OFFSET: f32 = 0.01;

/// Material parameters shared by every point and spring of a cloth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothParams {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            mass: 0.65,
            stiffness: 300.0,
            damping: 2.0,
        }
    }
}

impl ClothParams {
    pub fn new(mass: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            mass,
            stiffness,
            damping,
        }
    }
}

/// Selects which time-integration scheme advances the cloth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegratorKind {
    #[default]
    SemiImplicitEuler,
    Verlet,
    Pbd,
}

/// Wind forcing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    pub strength: f32,
    /// How fast the wind map scrolls along U, in texture widths per second.
    pub scroll_speed: f32,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            strength: 5.0,
            scroll_speed: 0.2,
        }
    }
}
