use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{CollisionContext, PredictedCollider};
use crate::{
    config::SPHERE_MARGIN,
    core::types::{ClothPoint, Transform},
};

/// World-space sphere that pushes predicted points onto its surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
    pub margin: f32,
}

impl SphereCollider {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            margin: SPHERE_MARGIN,
        }
    }

    /// Sphere of local `radius` attached to `transform`; the radius follows its largest scale axis.
    pub fn from_transform(transform: &Transform, radius: f32) -> Self {
        Self::new(transform.position, radius * transform.max_scale())
    }

    /// Surface point for `world`, or `None` when it is already clear of the
    /// surface margin or sits exactly at the centre.
    pub fn push_out(&self, world: Vec3) -> Option<Vec3> {
        let offset = world - self.center;
        let distance = offset.length();
        if distance >= self.radius + self.margin || distance == 0.0 {
            return None;
        }
        Some(self.center + offset / distance * (self.radius + self.margin))
    }
}

impl PredictedCollider for SphereCollider {
    fn resolve(
        &mut self,
        ctx: &CollisionContext<'_>,
        predicted: &mut [Vec3],
        points: &mut [ClothPoint],
    ) -> usize {
        let mut corrected = 0;
        for (point, predicted) in points.iter_mut().zip(predicted.iter_mut()) {
            if point.is_fixed {
                continue;
            }
            let world = ctx.cloth_transform.transform_point(*predicted);
            if let Some(surface) = self.push_out(world) {
                ctx.commit(surface, predicted, point);
                corrected += 1;
            }
        }
        corrected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_transform_grows_radius() {
        let transform = Transform {
            scale: Vec3::new(1.0, 3.0, 2.0),
            ..Transform::from_position(Vec3::Y)
        };
        let sphere = SphereCollider::from_transform(&transform, 0.5);
        assert_eq!(sphere.radius, 1.5);
        assert_eq!(sphere.center, Vec3::Y);
    }

    #[test]
    fn centre_and_outside_points_are_left_alone() {
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        assert!(sphere.push_out(Vec3::ZERO).is_none());
        assert!(sphere.push_out(Vec3::new(0.0, 1.01, 0.0)).is_none());
        let pushed = sphere.push_out(Vec3::new(0.0, 0.5, 0.0)).unwrap();
        assert!((pushed.y - (1.0 + SPHERE_MARGIN)).abs() < 1e-6);
    }
}
