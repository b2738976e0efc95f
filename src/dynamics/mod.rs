//! Force accumulation, wind, constraint projection and time integration.

pub mod constraints;
pub mod forces;
pub mod integrator;
pub mod pbd;
pub mod wind;

pub use constraints::ConstraintSolver;
pub use forces::{accumulate_all_spring_forces, accumulate_spring_forces, apply_gravity};
pub use integrator::{EulerIntegrator, Integrator, StepContext, Substeps, VerletIntegrator};
pub use pbd::{PbdIntegrator, StickState, StickTransition};
pub use wind::{UniformWind, WindField, WindForce, WindMap};
