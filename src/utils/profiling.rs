use std::time::{Duration, Instant};

/// Per-step phase timings and counts gathered by the cloth solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfiler {
    pub spring_force_time: Duration,
    pub wind_time: Duration,
    pub integrate_time: Duration,
    pub constraint_time: Duration,
    pub collision_time: Duration,

    pub point_count: usize,
    pub spring_count: usize,
    pub substeps: u32,
    /// Points dispatched to the mesh collision kernel during the last step.
    pub kernel_points: usize,
}

impl StepProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total_time(&self) -> Duration {
        self.spring_force_time + self.wind_time + self.integrate_time
    }

    pub fn report(&self) {
        let total_us = self.total_time().as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        let share = |d: Duration| (d.as_micros() as f32 / total_us) * 100.0;

        log::debug!(
            "cloth step: {} points, {} springs, {} substeps, {} kernel points, {:.2} ms",
            self.point_count,
            self.spring_count,
            self.substeps,
            self.kernel_points,
            total_us / 1000.0
        );
        log::debug!(
            "  springs {:.1}% | wind {:.1}% | integrate {:.1}% (constraints {:.1}%, collisions {:.1}%)",
            share(self.spring_force_time),
            share(self.wind_time),
            share(self.integrate_time),
            share(self.constraint_time),
            share(self.collision_time)
        );
    }
}

/// Adds the elapsed time of a scope into a profiler slot.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
