use glam::Vec3;

use super::{
    forces::{accumulate_all_spring_forces, apply_gravity, clear_forces},
    pbd::PbdIntegrator,
};
use crate::{
    collision::CollisionPipeline,
    config::{
        ClothParams, IntegratorKind, EULER_VELOCITY_DECAY, MAX_SUBSTEPS, MAX_SUBSTEP_DT,
        VERLET_DECAY,
    },
    core::{
        topology::ClothTopology,
        types::{ClothPoint, Transform},
    },
    utils::profiling::StepProfiler,
};

const MIN_SUBSTEP_DT: f32 = 1e-6;

/// Per-step inputs shared by every integrator.
pub struct StepContext<'a> {
    /// Gravity expressed in cloth-local space.
    pub gravity: Vec3,
    pub cloth_transform: &'a Transform,
    /// Only read by integrators that resolve collisions (PBD).
    pub collisions: Option<&'a mut CollisionPipeline>,
    pub profiler: &'a mut StepProfiler,
}

/// Splits a frame delta into sub-steps of at most `max_dt`, up to `max_steps`.
#[derive(Debug, Clone, Copy)]
pub struct Substeps {
    remaining: f32,
    taken: u32,
    max_dt: f32,
    max_steps: u32,
}

impl Substeps {
    pub fn new(dt: f32) -> Self {
        Self::with_limits(dt, MAX_SUBSTEP_DT, MAX_SUBSTEPS)
    }

    pub fn with_limits(dt: f32, max_dt: f32, max_steps: u32) -> Self {
        Self {
            remaining: dt,
            taken: 0,
            max_dt,
            max_steps,
        }
    }
}

impl Iterator for Substeps {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        // Residue left by float subtraction is not worth another step.
        if self.remaining <= MIN_SUBSTEP_DT || self.taken >= self.max_steps {
            return None;
        }
        let step = self.remaining.min(self.max_dt);
        self.remaining -= step;
        self.taken += 1;
        Some(step)
    }
}

/// Semi-implicit Euler: velocity from force, then position from velocity.
#[derive(Debug, Clone)]
pub struct EulerIntegrator {
    pub velocity_decay: f32,
}

impl Default for EulerIntegrator {
    fn default() -> Self {
        Self {
            velocity_decay: EULER_VELOCITY_DECAY,
        }
    }
}

impl EulerIntegrator {
    pub fn step(&self, points: &mut [ClothPoint], gravity: Vec3, dt: f32) {
        apply_gravity(points, gravity);
        for point in points.iter_mut() {
            if !point.is_fixed {
                let acceleration = point.force / point.mass;
                point.velocity += acceleration * dt;
                point.position += point.velocity * dt;
                point.velocity *= self.velocity_decay;
            }
            point.force = Vec3::ZERO;
        }
    }
}

/// Position Verlet with a decaying history term. Velocity is derived from the
/// displacement of the step and only feeds spring damping.
#[derive(Debug, Clone)]
pub struct VerletIntegrator {
    pub decay: f32,
    previous: Vec<Vec3>,
}

impl Default for VerletIntegrator {
    fn default() -> Self {
        Self {
            decay: VERLET_DECAY,
            previous: Vec::new(),
        }
    }
}

impl VerletIntegrator {
    pub fn reset(&mut self, points: &[ClothPoint]) {
        self.previous.clear();
        self.previous.extend(points.iter().map(|p| p.position));
    }

    pub fn previous_positions(&self) -> &[Vec3] {
        &self.previous
    }

    pub fn step(&mut self, points: &mut [ClothPoint], gravity: Vec3, dt: f32) {
        if self.previous.len() != points.len() {
            self.reset(points);
        }

        apply_gravity(points, gravity);
        for (point, previous) in points.iter_mut().zip(self.previous.iter_mut()) {
            if !point.is_fixed {
                let acceleration = point.force / point.mass;
                let current = point.position;

                point.position =
                    current + (current - *previous) * self.decay + acceleration * dt * dt;
                point.velocity = (point.position - current) * self.decay;

                *previous = current;
            }
            point.force = Vec3::ZERO;
        }
    }
}

/// Interchangeable time-integration strategies, each owning its own state.
#[derive(Debug, Clone)]
pub enum Integrator {
    Euler(EulerIntegrator),
    Verlet(VerletIntegrator),
    Pbd(PbdIntegrator),
}

impl Integrator {
    pub fn new(kind: IntegratorKind, params: &ClothParams) -> Self {
        match kind {
            IntegratorKind::SemiImplicitEuler => Integrator::Euler(EulerIntegrator::default()),
            IntegratorKind::Verlet => Integrator::Verlet(VerletIntegrator::default()),
            IntegratorKind::Pbd => Integrator::Pbd(PbdIntegrator::new(params)),
        }
    }

    pub fn kind(&self) -> IntegratorKind {
        match self {
            Integrator::Euler(_) => IntegratorKind::SemiImplicitEuler,
            Integrator::Verlet(_) => IntegratorKind::Verlet,
            Integrator::Pbd(_) => IntegratorKind::Pbd,
        }
    }

    /// Re-synchronises auxiliary buffers after the topology was rebuilt.
    pub fn reset(&mut self, points: &[ClothPoint]) {
        match self {
            Integrator::Euler(_) => {}
            Integrator::Verlet(verlet) => verlet.reset(points),
            Integrator::Pbd(pbd) => pbd.reset(points),
        }
    }

    pub fn update_parameters(&mut self, params: &ClothParams) {
        if let Integrator::Pbd(pbd) = self {
            pbd.update_parameters(params);
        }
    }

    /// Fills the force accumulators with spring forces.
    ///
    /// PBD moves through constraints instead, so it only clears them.
    pub fn apply_spring_forces(&self, topology: &mut ClothTopology) {
        let (points, springs) = topology.split_mut();
        match self {
            Integrator::Pbd(_) => clear_forces(points),
            Integrator::Euler(_) | Integrator::Verlet(_) => {
                accumulate_all_spring_forces(points, &springs)
            }
        }
    }

    /// Advances the cloth by `dt`.
    ///
    /// Euler and Verlet sub-step at [`MAX_SUBSTEP_DT`]. The first sub-step
    /// consumes the forces accumulated by the caller (springs, wind, point
    /// forces). Later sub-steps re-accumulate spring forces from the current
    /// state, so springs stay active for the whole frame and no sub-step runs
    /// on gravity alone. External forces are not repeated.
    pub fn integrate(&mut self, topology: &mut ClothTopology, ctx: &mut StepContext<'_>, dt: f32) {
        if dt <= 0.0 || topology.is_empty() {
            return;
        }

        match self {
            Integrator::Euler(euler) => {
                for (n, h) in Substeps::new(dt).enumerate() {
                    let (points, springs) = topology.split_mut();
                    if n > 0 {
                        accumulate_all_spring_forces(points, &springs);
                    }
                    euler.step(points, ctx.gravity, h);
                    ctx.profiler.substeps += 1;
                }
            }
            Integrator::Verlet(verlet) => {
                for (n, h) in Substeps::new(dt).enumerate() {
                    let (points, springs) = topology.split_mut();
                    if n > 0 {
                        accumulate_all_spring_forces(points, &springs);
                    }
                    verlet.step(points, ctx.gravity, h);
                    ctx.profiler.substeps += 1;
                }
            }
            Integrator::Pbd(pbd) => {
                pbd.step(topology, ctx, dt);
                ctx.profiler.substeps += 1;
            }
        }
    }
}
