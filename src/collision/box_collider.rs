use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{CollisionContext, PredictedCollider};
use crate::{
    config::BOX_MARGIN,
    core::types::{ClothPoint, Transform},
};

/// Oriented box. Points inside are pushed out through the nearest face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    /// Box frame; only position and rotation are used.
    pub frame: Transform,
    pub half_extents: Vec3,
    pub margin: f32,
}

impl BoxCollider {
    pub fn new(frame: Transform, half_extents: Vec3) -> Self {
        Self {
            frame: Transform {
                scale: Vec3::ONE,
                ..frame
            },
            half_extents: half_extents.abs(),
            margin: BOX_MARGIN,
        }
    }

    /// Box of local `size` whose extents are scaled by `transform.scale`.
    pub fn from_size(transform: &Transform, size: Vec3) -> Self {
        Self::new(*transform, size * 0.5 * transform.scale)
    }

    /// Pushes a box-local point out through the face it is closest to.
    ///
    /// Points on the boundary count as inside. Ties between axes prefer X,
    /// then Y, then Z.
    pub fn push_out_local(&self, local: Vec3) -> Option<Vec3> {
        let h = self.half_extents;
        if local.x.abs() > h.x || local.y.abs() > h.y || local.z.abs() > h.z {
            return None;
        }

        let dx = h.x - local.x.abs();
        let dy = h.y - local.y.abs();
        let dz = h.z - local.z.abs();

        let mut pushed = local;
        if dx <= dy && dx <= dz {
            pushed.x = local.x.signum() * (h.x + self.margin);
        } else if dy <= dz {
            pushed.y = local.y.signum() * (h.y + self.margin);
        } else {
            pushed.z = local.z.signum() * (h.z + self.margin);
        }
        Some(pushed)
    }
}

impl PredictedCollider for BoxCollider {
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
            let local = self.frame.inverse_transform_point(world);
            if let Some(pushed) = self.push_out_local(local) {
                ctx.commit(self.frame.transform_point(pushed), predicted, point);
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
    fn nearest_face_wins() {
        let cube = BoxCollider::new(Transform::default(), Vec3::splat(0.5));
        let pushed = cube.push_out_local(Vec3::new(0.0, -0.45, 0.1)).unwrap();
        assert_eq!(pushed.x, 0.0);
        assert_eq!(pushed.z, 0.1);
        assert!((pushed.y + 0.5 + BOX_MARGIN).abs() < 1e-6);
    }

    #[test]
    fn ties_prefer_x_then_y() {
        let cube = BoxCollider::new(Transform::default(), Vec3::splat(0.5));
        let centre = cube.push_out_local(Vec3::ZERO).unwrap();
        assert_eq!(centre.y, 0.0);
        assert_eq!(centre.z, 0.0);
        assert!((centre.x - (0.5 + BOX_MARGIN)).abs() < 1e-6);

        let yz_tie = cube.push_out_local(Vec3::new(0.0, 0.3, 0.3)).unwrap();
        assert!((yz_tie.y - (0.5 + BOX_MARGIN)).abs() < 1e-6);
        assert_eq!(yz_tie.z, 0.3);
    }

    #[test]
    fn size_is_scaled_into_half_extents() {
        let transform = Transform {
            scale: Vec3::new(2.0, 1.0, 4.0),
            ..Transform::default()
        };
        let cube = BoxCollider::from_size(&transform, Vec3::ONE);
        assert_eq!(cube.half_extents, Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(cube.frame.scale, Vec3::ONE);
        assert!(cube.push_out_local(Vec3::new(1.5, 0.0, 0.0)).is_none());
    }
}
