use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{CollisionContext, PredictedCollider};
use crate::{config::GROUND_MARGIN, core::types::ClothPoint};

/// Horizontal plane at world `height`; points are held `margin` above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    pub height: f32,
    pub margin: f32,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl GroundPlane {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            margin: GROUND_MARGIN,
        }
    }

    pub fn rest_height(&self) -> f32 {
        self.height + self.margin
    }
}

impl PredictedCollider for GroundPlane {
    /// Ground contact never sticks.
    fn resolve(
        &mut self,
        ctx: &CollisionContext<'_>,
        predicted: &mut [Vec3],
        points: &mut [ClothPoint],
    ) -> usize {
        let floor = self.rest_height();
        let mut corrected = 0;
        for (point, predicted) in points.iter_mut().zip(predicted.iter_mut()) {
            if point.is_fixed {
                continue;
            }
            let mut world = ctx.cloth_transform.transform_point(*predicted);
            if world.y < floor {
                world.y = floor;
                *predicted = ctx.cloth_transform.inverse_transform_point(world);
                corrected += 1;
            }
        }
        corrected
    }
}
