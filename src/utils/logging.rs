use std::time::{Duration, Instant};

use log::{log_enabled, trace, warn, Level};

/// Phases of a cloth step that are traced individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    SpringForces,
    Wind,
    Integrate,
    Predict,
    Constraints,
    Collisions,
}

impl StepPhase {
    pub fn label(self) -> &'static str {
        match self {
            StepPhase::SpringForces => "cloth::springs",
            StepPhase::Wind => "cloth::wind",
            StepPhase::Integrate => "cloth::integrate",
            StepPhase::Predict => "pbd::predict",
            StepPhase::Constraints => "pbd::constraints",
            StepPhase::Collisions => "pbd::collisions",
        }
    }
}

/// Traces how long one step phase took. Free when trace logging is off.
pub struct ScopedTimer {
    phase: StepPhase,
    start: Option<Instant>,
}

impl ScopedTimer {
    pub fn new(phase: StepPhase) -> Self {
        Self {
            phase,
            start: log_enabled!(Level::Trace).then(Instant::now),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            trace!(
                "{} took {} µs",
                self.phase.label(),
                start.elapsed().as_micros()
            );
        }
    }
}

/// Warns when one cloth step took longer than the host's budget.
pub fn warn_if_step_budget_exceeded(duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("cloth step exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
        return true;
    }
    false
}
