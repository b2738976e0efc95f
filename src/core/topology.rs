//! Grid-to-spring-network conversion.
//!
//! A `(width + 1) x (height + 1)` row-major vertex grid becomes one point per
//! vertex and three disjoint spring sets:
//!
//! ```text
//! 0 --- 1 --- 2      structural: right, down
//! | \ / | \ / |      shear:      down-right, down-left
//! 3 --- 4 --- 5      bend:       right + 2, down + 2
//! | / \ | / \ |
//! 6 --- 7 --- 8
//! ```

use glam::Vec3;
use log::debug;

use super::types::{ClothPoint, Spring, SpringKind};
use crate::{
    config::{ClothParams, BEND_STIFFNESS_SCALE},
    error::{ClothError, Result},
};

/// Points and springs of one cloth instance.
#[derive(Debug, Clone, Default)]
pub struct ClothTopology {
    points: Vec<ClothPoint>,
    structural: Vec<Spring>,
    shear: Vec<Spring>,
    bend: Vec<Spring>,
    width: usize,
    height: usize,
}

impl ClothTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds every point and spring from the vertex grid.
    ///
    /// When `allow_fall` is false the whole top row is pinned. Nothing is
    /// modified if validation fails.
    pub fn setup(
        &mut self,
        vertices: &[Vec3],
        width: usize,
        height: usize,
        params: &ClothParams,
        allow_fall: bool,
    ) -> Result<()> {
        validate_mass(params.mass)?;
        let count_x = width
            .checked_add(1)
            .ok_or(ClothError::InvalidDimensions { width, height })?;
        let expected = height
            .checked_add(1)
            .and_then(|rows| rows.checked_mul(count_x))
            .ok_or(ClothError::InvalidDimensions { width, height })?;
        if vertices.len() != expected {
            return Err(ClothError::GridSizeMismatch {
                expected,
                actual: vertices.len(),
            });
        }

        let mut points: Vec<ClothPoint> = vertices
            .iter()
            .map(|&v| ClothPoint::new(v, params.mass))
            .collect();
        if !allow_fall {
            for point in points.iter_mut().take(count_x) {
                point.is_fixed = true;
            }
        }

        let mut builder = SpringBuilder {
            points: &points,
            params,
            structural: Vec::new(),
            shear: Vec::new(),
            bend: Vec::new(),
        };

        for y in 0..=height {
            for x in 0..=width {
                let i = y * count_x + x;

                if x < width {
                    builder.add(SpringKind::Structural, i, i + 1);
                }
                if y < height {
                    builder.add(SpringKind::Structural, i, i + count_x);
                }

                if x < width && y < height {
                    builder.add(SpringKind::Shear, i, i + count_x + 1);
                }
                if x > 0 && y < height {
                    builder.add(SpringKind::Shear, i, i + count_x - 1);
                }

                if x + 1 < width {
                    builder.add(SpringKind::Bend, i, i + 2);
                }
                if y + 1 < height {
                    builder.add(SpringKind::Bend, i, i + 2 * count_x);
                }
            }
        }

        let SpringBuilder {
            structural,
            shear,
            bend,
            ..
        } = builder;

        debug!(
            "cloth topology rebuilt: {} points, {} structural, {} shear, {} bend springs",
            points.len(),
            structural.len(),
            shear.len(),
            bend.len()
        );

        points.shrink_to_fit();
        self.points = points;
        self.structural = structural;
        self.shear = shear;
        self.bend = bend;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Updates mass of free points and stiffness/damping of every spring in place.
    ///
    /// Positions, velocities and topology are untouched, so repeated calls with
    /// the same values are no-ops after the first. An invalid mass rejects the
    /// whole update.
    pub fn update_parameters(&mut self, params: &ClothParams) -> Result<()> {
        validate_mass(params.mass)?;
        for point in self.points.iter_mut().filter(|p| !p.is_fixed) {
            point.mass = params.mass;
        }
        for spring in self.structural.iter_mut().chain(self.shear.iter_mut()) {
            spring.stiffness = params.stiffness;
            spring.damping = params.damping;
        }
        for spring in &mut self.bend {
            spring.stiffness = params.stiffness * BEND_STIFFNESS_SCALE;
            spring.damping = params.damping;
        }
        Ok(())
    }

    pub fn points(&self) -> &[ClothPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [ClothPoint] {
        &mut self.points
    }

    pub fn springs(&self, kind: SpringKind) -> &[Spring] {
        match kind {
            SpringKind::Structural => &self.structural,
            SpringKind::Shear => &self.shear,
            SpringKind::Bend => &self.bend,
        }
    }

    /// Splits the topology into the mutable point set and the three read-only spring sets.
    pub fn split_mut(&mut self) -> (&mut [ClothPoint], [&[Spring]; 3]) {
        (
            &mut self.points,
            [&self.structural, &self.shear, &self.bend],
        )
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn spring_count(&self) -> usize {
        self.structural.len() + self.shear.len() + self.bend.len()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Point mass must be finite and strictly positive.
fn validate_mass(mass: f32) -> Result<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(ClothError::InvalidMass(mass))
    }
}

struct SpringBuilder<'a> {
    points: &'a [ClothPoint],
    params: &'a ClothParams,
    structural: Vec<Spring>,
    shear: Vec<Spring>,
    bend: Vec<Spring>,
}

impl SpringBuilder<'_> {
    fn add(&mut self, kind: SpringKind, a: usize, b: usize) {
        let rest_length = self.points[a].position.distance(self.points[b].position);
        let (stiffness, list) = match kind {
            SpringKind::Structural => (self.params.stiffness, &mut self.structural),
            SpringKind::Shear => (self.params.stiffness, &mut self.shear),
            SpringKind::Bend => (
                self.params.stiffness * BEND_STIFFNESS_SCALE,
                &mut self.bend,
            ),
        };
        list.push(Spring::new(a, b, rest_length, stiffness, self.params.damping));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize) -> Vec<Vec3> {
        let mut vertices = Vec::new();
        for y in 0..=height {
            for x in 0..=width {
                vertices.push(Vec3::new(x as f32, -(y as f32), 0.0));
            }
        }
        vertices
    }

    #[test]
    fn spring_counts_match_grid_adjacency() {
        let mut topology = ClothTopology::new();
        topology
            .setup(&grid(3, 2), 3, 2, &ClothParams::default(), false)
            .unwrap();

        // 3 rows of 3 horizontal edges + 4 columns of 2 vertical edges
        assert_eq!(topology.springs(SpringKind::Structural).len(), 9 + 8);
        assert_eq!(topology.springs(SpringKind::Shear).len(), 2 * 3 * 2);
        // 3 rows of 2 horizontal skips + 4 columns of 1 vertical skip
        assert_eq!(topology.springs(SpringKind::Bend).len(), 6 + 4);
    }

    #[test]
    fn invalid_mass_update_changes_nothing() {
        let mut topology = ClothTopology::new();
        topology
            .setup(&grid(2, 2), 2, 2, &ClothParams::default(), false)
            .unwrap();
        let before = topology.clone();

        for mass in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = topology
                .update_parameters(&ClothParams::new(mass, 900.0, 0.5))
                .unwrap_err();
            assert!(matches!(err, ClothError::InvalidMass(_)));
        }

        assert_eq!(topology.points(), before.points());
        assert_eq!(
            topology.springs(SpringKind::Structural),
            before.springs(SpringKind::Structural)
        );
    }

    #[test]
    fn bend_springs_are_softer() {
        let mut topology = ClothTopology::new();
        let params = ClothParams::new(1.0, 100.0, 1.0);
        topology.setup(&grid(2, 2), 2, 2, &params, true).unwrap();

        for spring in topology.springs(SpringKind::Bend) {
            assert!((spring.stiffness - 60.0).abs() < 1e-4);
        }
        assert!(topology.points().iter().all(|p| !p.is_fixed));
    }

    #[test]
    fn failed_setup_keeps_previous_topology() {
        let mut topology = ClothTopology::new();
        topology
            .setup(&grid(2, 2), 2, 2, &ClothParams::default(), false)
            .unwrap();

        let err = topology
            .setup(&grid(2, 2), 3, 2, &ClothParams::default(), false)
            .unwrap_err();
        assert_eq!(
            err,
            ClothError::GridSizeMismatch {
                expected: 12,
                actual: 9
            }
        );
        assert_eq!(topology.point_count(), 9);
    }
}
