//! Position-based dynamics integrator.
//!
//! Each step runs a fixed pipeline over an owned scratch buffer of predicted
//! positions:
//!
//! 1. predict with semi-implicit Euler on external forces and gravity
//!    (fixed points are re-pinned instead),
//! 2. project distance constraints, structural then shear then bend, for
//!    [`PBD_SOLVER_ITERATIONS`] Gauss-Seidel sweeps,
//! 3. resolve collisions in the order sphere, box, mesh, ground,
//! 4. commit positions and rebuild velocity from the net displacement.

use glam::Vec3;
use log::debug;

use super::{constraints::ConstraintSolver, integrator::StepContext};
use crate::{
    config::{ClothParams, PBD_DAMPING_RATE, PBD_SOLVER_ITERATIONS, STICKY_RELEASE_KICK},
    core::{topology::ClothTopology, types::ClothPoint},
    utils::{
        logging::{ScopedTimer, StepPhase},
        profiling::PhaseTimer,
    },
};

/// Whether contacts currently freeze the cloth in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StickState {
    #[default]
    Free,
    Sticking,
}

/// Edge reported when the stick flag changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickTransition {
    Unchanged,
    Engaged,
    Released,
}

impl StickState {
    /// Moves to the state requested by `sticky` and reports the edge taken.
    pub fn advance(&mut self, sticky: bool) -> StickTransition {
        let (next, transition) = match (*self, sticky) {
            (StickState::Free, true) => (StickState::Sticking, StickTransition::Engaged),
            (StickState::Sticking, false) => (StickState::Free, StickTransition::Released),
            (state, _) => (state, StickTransition::Unchanged),
        };
        *self = next;
        transition
    }
}

/// `exp(-damping * rate)`, the per-step velocity retention of PBD.
pub fn damping_factor(damping: f32) -> f32 {
    (-damping * PBD_DAMPING_RATE).exp()
}

#[derive(Debug, Clone)]
pub struct PbdIntegrator {
    solver: ConstraintSolver,
    damping_factor: f32,
    stick_state: StickState,
    previous: Vec<Vec3>,
    predicted: Vec<Vec3>,
}

impl PbdIntegrator {
    pub fn new(params: &ClothParams) -> Self {
        Self {
            solver: ConstraintSolver::new(PBD_SOLVER_ITERATIONS),
            damping_factor: damping_factor(params.damping),
            stick_state: StickState::Free,
            previous: Vec::new(),
            predicted: Vec::new(),
        }
    }

    pub fn reset(&mut self, points: &[ClothPoint]) {
        self.previous.clear();
        self.predicted.clear();
        self.previous.extend(points.iter().map(|p| p.position));
        self.predicted.extend(points.iter().map(|p| p.position));
    }

    pub fn update_parameters(&mut self, params: &ClothParams) {
        self.damping_factor = damping_factor(params.damping);
    }

    pub fn damping_factor(&self) -> f32 {
        self.damping_factor
    }

    pub fn stick_state(&self) -> StickState {
        self.stick_state
    }

    pub fn solver(&self) -> &ConstraintSolver {
        &self.solver
    }

    pub fn predicted_positions(&self) -> &[Vec3] {
        &self.predicted
    }

    pub fn previous_positions(&self) -> &[Vec3] {
        &self.previous
    }

    pub fn step(&mut self, topology: &mut ClothTopology, ctx: &mut StepContext<'_>, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        if self.predicted.len() != topology.point_count() {
            self.reset(topology.points());
        }

        let sticky_now = ctx
            .collisions
            .as_deref()
            .is_some_and(|pipeline| pipeline.stick_to_mesh());
        let (points, springs) = topology.split_mut();

        match self.stick_state.advance(sticky_now) {
            StickTransition::Released => {
                let released = release_frozen(points, ctx.gravity.normalize_or_zero());
                debug!("sticky contact released, {released} points unfrozen");
            }
            StickTransition::Engaged => debug!("sticky contact engaged"),
            StickTransition::Unchanged => {}
        }

        {
            let _timer = ScopedTimer::new(StepPhase::Predict);
            self.predict(points, ctx.gravity, dt);
        }

        {
            let _timer = ScopedTimer::new(StepPhase::Constraints);
            let _phase = PhaseTimer::new(&mut ctx.profiler.constraint_time);
            self.solver.solve(points, &mut self.predicted, &springs);
        }

        if let Some(pipeline) = ctx.collisions.as_deref_mut() {
            let _timer = ScopedTimer::new(StepPhase::Collisions);
            let _phase = PhaseTimer::new(&mut ctx.profiler.collision_time);
            let report = pipeline.resolve(ctx.cloth_transform, &mut self.predicted, points);
            ctx.profiler.kernel_points = report.kernel_points;
        }

        self.commit(points, dt);
    }

    fn predict(&mut self, points: &mut [ClothPoint], gravity: Vec3, dt: f32) {
        let buffers = self.previous.iter_mut().zip(self.predicted.iter_mut());
        for (point, (previous, predicted)) in points.iter_mut().zip(buffers) {
            if point.is_fixed {
                point.velocity = Vec3::ZERO;
                point.force = Vec3::ZERO;
                *previous = point.position;
                *predicted = point.position;
                continue;
            }

            point.force += gravity * point.mass;
            let acceleration = point.force / point.mass;
            point.velocity += acceleration * dt;
            point.force = Vec3::ZERO;

            *previous = point.position;
            *predicted = point.position + point.velocity * dt;
        }
    }

    fn commit(&self, points: &mut [ClothPoint], dt: f32) {
        for (point, &predicted) in points.iter_mut().zip(&self.predicted) {
            // Points frozen by sticky contacts were already committed by their resolver.
            if point.is_fixed {
                continue;
            }
            point.velocity = (predicted - point.position) / dt * self.damping_factor;
            point.position = predicted;
        }
    }
}

/// Frees every point, setup anchors included, and nudges it along `down`.
fn release_frozen(points: &mut [ClothPoint], down: Vec3) -> usize {
    let mut released = 0;
    for point in points.iter_mut() {
        if point.is_fixed {
            point.is_fixed = false;
            released += 1;
        }
        point.velocity += down * STICKY_RELEASE_KICK;
    }
    released
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_state_reports_edges_once() {
        let mut state = StickState::default();
        assert_eq!(state.advance(false), StickTransition::Unchanged);
        assert_eq!(state.advance(true), StickTransition::Engaged);
        assert_eq!(state.advance(true), StickTransition::Unchanged);
        assert_eq!(state.advance(false), StickTransition::Released);
        assert_eq!(state, StickState::Free);
    }

    #[test]
    fn damping_factor_decays_exponentially() {
        assert_eq!(damping_factor(0.0), 1.0);
        assert!((damping_factor(2.0) - (-0.4f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn release_frees_and_kicks_every_point() {
        let mut points = vec![
            ClothPoint::pinned(Vec3::ZERO, 1.0),
            ClothPoint::new(Vec3::X, 1.0),
            ClothPoint::new(Vec3::Y, 1.0),
        ];
        points[1].freeze();

        let released = release_frozen(&mut points, Vec3::NEG_Y);

        assert_eq!(released, 2);
        let kick = Vec3::new(0.0, -STICKY_RELEASE_KICK, 0.0);
        for point in &points {
            assert!(!point.is_fixed);
            assert_eq!(point.velocity, kick);
        }
    }
}
