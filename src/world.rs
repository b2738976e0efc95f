use std::time::Instant;

use glam::{Vec2, Vec3};
use log::{debug, warn};

use crate::{
    collision::CollisionPipeline,
    config::{ClothParams, IntegratorKind, WindSettings, DEFAULT_GRAVITY},
    core::{
        topology::ClothTopology,
        types::{ClothPoint, Spring, SpringKind, Transform},
    },
    dynamics::{
        integrator::{Integrator, StepContext},
        wind::{WindField, WindForce},
    },
    error::Result,
    utils::{
        logging::{warn_if_step_budget_exceeded, ScopedTimer, StepPhase},
        profiling::{PhaseTimer, StepProfiler},
    },
};

/// One simulated cloth: its topology, integrator, colliders and wind.
///
/// A frame is driven by the host as `apply_spring_forces`, `apply_wind`,
/// `integrate`, then `copy_positions` into the render buffer.
#[derive(Debug)]
pub struct ClothSolver {
    topology: ClothTopology,
    integrator: Integrator,
    collisions: Option<CollisionPipeline>,
    cloth_transform: Transform,
    gravity: Vec3,
    wind: WindForce,
    params: ClothParams,
    allow_fall: bool,

    initial_vertices: Vec<Vec3>,
    dimensions: (usize, usize),

    current: StepProfiler,
    last_step: StepProfiler,
    step_budget_ms: Option<f32>,
}

impl ClothSolver {
    /// Creates an unconfigured solver. Collisions are only consumed by PBD.
    pub fn new(kind: IntegratorKind, params: ClothParams, collisions: Option<CollisionPipeline>) -> Self {
        if collisions.is_some() && kind != IntegratorKind::Pbd {
            debug!("{kind:?} integrator ignores the collision pipeline");
        }
        Self {
            topology: ClothTopology::new(),
            integrator: Integrator::new(kind, &params),
            collisions,
            cloth_transform: Transform::default(),
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            wind: WindForce::default(),
            params,
            allow_fall: false,
            initial_vertices: Vec::new(),
            dimensions: (0, 0),
            current: StepProfiler::default(),
            last_step: StepProfiler::default(),
            step_budget_ms: None,
        }
    }

    /// Builds the cloth from a `(width + 1) x (height + 1)` row-major vertex grid.
    ///
    /// On error the previous cloth, if any, is kept untouched.
    pub fn configure(
        &mut self,
        vertices: &[Vec3],
        width: usize,
        height: usize,
        params: ClothParams,
    ) -> Result<()> {
        self.topology
            .setup(vertices, width, height, &params, self.allow_fall)?;
        self.params = params;
        self.integrator.update_parameters(&params);
        self.initial_vertices = vertices.to_vec();
        self.dimensions = (width, height);
        self.integrator.reset(self.topology.points());
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.topology.is_empty()
    }

    /// Rebuilds the cloth from the vertices passed to the last `configure`,
    /// discarding all motion. A no-op before the first configuration.
    pub fn reset(&mut self) -> Result<()> {
        if self.initial_vertices.is_empty() {
            return Ok(());
        }
        let (width, height) = self.dimensions;
        self.topology.setup(
            &self.initial_vertices,
            width,
            height,
            &self.params,
            self.allow_fall,
        )?;
        self.integrator.reset(self.topology.points());
        Ok(())
    }

    pub fn allow_fall(&self) -> bool {
        self.allow_fall
    }

    /// Toggles whether the top row is pinned. Changing it rebuilds the cloth.
    pub fn set_allow_fall(&mut self, allow_fall: bool) -> Result<()> {
        if self.allow_fall == allow_fall {
            return Ok(());
        }
        self.allow_fall = allow_fall;
        debug!("allow_fall set to {allow_fall}, rebuilding cloth");
        self.reset()
    }

    pub fn params(&self) -> &ClothParams {
        &self.params
    }

    /// Applies new material parameters to every point and spring in place.
    ///
    /// An invalid mass is logged and the update is dropped, leaving the cloth
    /// on its previous parameters.
    pub fn update_parameters(&mut self, params: ClothParams) -> Result<()> {
        if let Err(err) = self.topology.update_parameters(&params) {
            warn!("cloth parameter update ignored: {err}");
            return Err(err);
        }
        self.params = params;
        self.integrator.update_parameters(&params);
        debug!(
            "cloth parameters updated: mass {}, stiffness {}, damping {}",
            params.mass, params.stiffness, params.damping
        );
        Ok(())
    }

    pub fn apply_spring_forces(&mut self) {
        let _timer = ScopedTimer::new(StepPhase::SpringForces);
        let _phase = PhaseTimer::new(&mut self.current.spring_force_time);
        self.integrator.apply_spring_forces(&mut self.topology);
    }

    /// Adds wind sampled from `field` at one UV per point. `None` disables wind.
    pub fn apply_wind(&mut self, field: Option<&dyn WindField>, uvs: &[Vec2], dt: f32) {
        let Some(field) = field else {
            return;
        };
        let _timer = ScopedTimer::new(StepPhase::Wind);
        let _phase = PhaseTimer::new(&mut self.current.wind_time);
        self.wind
            .apply(field, uvs, self.topology.points_mut(), dt);
    }

    /// Adds an external force to one point for the next step.
    ///
    /// Returns `false` when the index is out of range or the point is fixed.
    pub fn apply_point_force(&mut self, index: usize, force: Vec3) -> bool {
        match self.topology.points_mut().get_mut(index) {
            Some(point) if !point.is_fixed => {
                point.apply_force(force);
                true
            }
            _ => false,
        }
    }

    /// Advances the cloth by `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 {
            warn!("integrate called with non-positive dt {dt}, skipping");
            return;
        }
        if self.topology.is_empty() {
            return;
        }

        let _timer = ScopedTimer::new(StepPhase::Integrate);
        let start = Instant::now();
        {
            let mut ctx = StepContext {
                gravity: self.cloth_transform.inverse_transform_direction(self.gravity),
                cloth_transform: &self.cloth_transform,
                collisions: self.collisions.as_mut(),
                profiler: &mut self.current,
            };
            self.integrator
                .integrate(&mut self.topology, &mut ctx, dt);
        }
        self.current.integrate_time += start.elapsed();
        self.current.point_count = self.topology.point_count();
        self.current.spring_count = self.topology.spring_count();

        self.current.report();
        if let Some(budget) = self.step_budget_ms {
            warn_if_step_budget_exceeded(self.current.total_time(), budget);
        }
        self.last_step = self.current;
        self.current.reset();
    }

    /// Copies point positions into `out`, indexed like the configured grid.
    ///
    /// Returns the number of positions written; nothing is written when `out`
    /// is shorter than the point count.
    pub fn copy_positions(&self, out: &mut [Vec3]) -> usize {
        let points = self.topology.points();
        if out.len() < points.len() {
            warn!(
                "position buffer too short: {} slots for {} points",
                out.len(),
                points.len()
            );
            return 0;
        }
        for (slot, point) in out.iter_mut().zip(points) {
            *slot = point.position;
        }
        points.len()
    }

    pub fn points(&self) -> &[ClothPoint] {
        self.topology.points()
    }

    pub fn springs(&self, kind: SpringKind) -> &[Spring] {
        self.topology.springs(kind)
    }

    pub fn structural_springs(&self) -> &[Spring] {
        self.springs(SpringKind::Structural)
    }

    pub fn shear_springs(&self) -> &[Spring] {
        self.springs(SpringKind::Shear)
    }

    pub fn bend_springs(&self) -> &[Spring] {
        self.springs(SpringKind::Bend)
    }

    pub fn topology(&self) -> &ClothTopology {
        &self.topology
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn integrator_kind(&self) -> IntegratorKind {
        self.integrator.kind()
    }

    pub fn collisions(&self) -> Option<&CollisionPipeline> {
        self.collisions.as_ref()
    }

    pub fn collisions_mut(&mut self) -> Option<&mut CollisionPipeline> {
        self.collisions.as_mut()
    }

    pub fn cloth_transform(&self) -> &Transform {
        &self.cloth_transform
    }

    /// Moves the cloth frame. Points stay in cloth-local space.
    pub fn set_cloth_transform(&mut self, transform: Transform) {
        self.cloth_transform = transform;
    }

    /// World-space gravity.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn wind_settings(&self) -> &WindSettings {
        &self.wind.settings
    }

    pub fn set_wind_settings(&mut self, settings: WindSettings) {
        self.wind.settings = settings;
    }

    /// Timings and counts of the last completed `integrate` call.
    pub fn profiler(&self) -> &StepProfiler {
        &self.last_step
    }

    /// Logs a warning whenever a step exceeds `budget_ms`. `None` disables the check.
    pub fn set_step_budget(&mut self, budget_ms: Option<f32>) {
        self.step_budget_ms = budget_ms;
    }
}
