use glam::Vec3;

use crate::{
    config::{PBD_SOLVER_ITERATIONS, PBD_STIFFNESS_SCALE},
    core::types::{ClothPoint, Spring},
};

/// Gauss-Seidel distance-constraint projection over predicted positions.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    pub iterations: u32,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new(PBD_SOLVER_ITERATIONS)
    }
}

impl ConstraintSolver {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Per-sweep correction factor for a spring, in `[0, 1]`.
    pub fn correction_factor(stiffness: f32) -> f32 {
        (stiffness / PBD_STIFFNESS_SCALE).clamp(0.0, 1.0)
    }

    /// Runs every iteration across the spring sets in the given order.
    pub fn solve(&self, points: &[ClothPoint], predicted: &mut [Vec3], spring_sets: &[&[Spring]]) {
        for _ in 0..self.iterations {
            for springs in spring_sets {
                Self::project(points, predicted, springs);
            }
        }
    }

    /// One sweep over a spring set, updating `predicted` in place.
    pub fn project(points: &[ClothPoint], predicted: &mut [Vec3], springs: &[Spring]) {
        for spring in springs {
            let (ia, ib) = (spring.index_a, spring.index_b);
            let delta = predicted[ib] - predicted[ia];
            let distance = delta.length();
            if distance == 0.0 {
                continue;
            }
            let direction = delta / distance;
            let constraint = distance - spring.rest_length;

            let wa = points[ia].inverse_mass();
            let wb = points[ib].inverse_mass();
            let w_sum = wa + wb;
            if w_sum == 0.0 {
                continue;
            }

            let k = Self::correction_factor(spring.stiffness);
            let correction = k * constraint * direction;

            if wa > 0.0 {
                predicted[ia] += correction * (wa / w_sum);
            }
            if wb > 0.0 {
                predicted[ib] -= correction * (wb / w_sum);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correction_factor_is_clamped() {
        assert_eq!(ConstraintSolver::correction_factor(-5.0), 0.0);
        assert_eq!(ConstraintSolver::correction_factor(600.0), 0.5);
        assert_eq!(ConstraintSolver::correction_factor(5000.0), 1.0);
    }

    #[test]
    fn fixed_endpoint_never_moves() {
        let points = [
            ClothPoint::pinned(Vec3::ZERO, 1.0),
            ClothPoint::new(Vec3::new(3.0, 0.0, 0.0), 1.0),
        ];
        let mut predicted = vec![points[0].position, points[1].position];
        let springs = [Spring::new(0, 1, 1.0, 1200.0, 0.0)];

        ConstraintSolver::project(&points, &mut predicted, &springs);

        assert_eq!(predicted[0], Vec3::ZERO);
        assert!((predicted[1] - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn both_fixed_is_skipped() {
        let points = [
            ClothPoint::pinned(Vec3::ZERO, 1.0),
            ClothPoint::pinned(Vec3::new(3.0, 0.0, 0.0), 1.0),
        ];
        let mut predicted = vec![points[0].position, points[1].position];
        let springs = [Spring::new(0, 1, 1.0, 1200.0, 0.0)];

        ConstraintSolver::project(&points, &mut predicted, &springs);

        assert_eq!(predicted[1], Vec3::new(3.0, 0.0, 0.0));
    }
}
