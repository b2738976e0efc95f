//! Texture-driven wind forcing.
//!
//! A [`WindField`] is sampled per point at its UV (scrolled along U over
//! time). The colour is mapped to a direction in `[-1, 1]^3`, its vertical
//! part flattened, and the magnitude modulated by a sinusoidal gust, a
//! per-point jitter and smooth noise before being raised to
//! [`WIND_EXPONENT`].

use glam::{Vec2, Vec3};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    config::{WindSettings, WIND_EXPONENT},
    core::types::ClothPoint,
    utils::{math::wrap01, noise::noise2},
};

/// 2D field returning an RGB sample in `[0, 1]^3` for a UV coordinate.
pub trait WindField: Send + Sync {
    fn sample(&self, uv: Vec2) -> Vec3;
}

/// Same sample everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformWind {
    pub color: Vec3,
}

impl UniformWind {
    /// Builds the colour that decodes to `direction` (components in `[-1, 1]`).
    pub fn from_direction(direction: Vec3) -> Self {
        Self {
            color: (direction.clamp(Vec3::splat(-1.0), Vec3::ONE) + Vec3::ONE) * 0.5,
        }
    }
}

impl WindField for UniformWind {
    fn sample(&self, _uv: Vec2) -> Vec3 {
        self.color
    }
}

/// Row-major RGB texel grid sampled bilinearly with repeat addressing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindMap {
    width: usize,
    height: usize,
    texels: Vec<Vec3>,
}

impl WindMap {
    /// Returns `None` when the texel count does not match the dimensions.
    pub fn new(width: usize, height: usize, texels: Vec<Vec3>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            texels,
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn texel(&self, x: i64, y: i64) -> Vec3 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.texels[y * self.width + x]
    }
}

impl WindField for WindMap {
    fn sample(&self, uv: Vec2) -> Vec3 {
        // Texel centres sit at half-integer coordinates.
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), tx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), tx);
        top.lerp(bottom, ty)
    }
}

/// Accumulates wind forces and owns the scrolling wind clock.
#[derive(Debug, Clone, Default)]
pub struct WindForce {
    pub settings: WindSettings,
    time: f32,
}

impl WindForce {
    pub fn new(settings: WindSettings) -> Self {
        Self {
            settings,
            time: 0.0,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advances the clock by `dt` and adds the wind force to every free point.
    ///
    /// `uvs` must hold one coordinate per point; otherwise the call is skipped.
    pub fn apply(
        &mut self,
        field: &dyn WindField,
        uvs: &[Vec2],
        points: &mut [ClothPoint],
        dt: f32,
    ) {
        if uvs.len() != points.len() {
            warn!(
                "wind skipped: {} uvs for {} cloth points",
                uvs.len(),
                points.len()
            );
            return;
        }

        self.time += dt.max(0.0) * self.settings.scroll_speed;
        let t = self.time;
        let strength = self.settings.strength.max(0.0);

        for (i, (point, uv)) in points.iter_mut().zip(uvs).enumerate() {
            if point.is_fixed {
                continue;
            }

            let u = wrap01(uv.x + t);
            let v = uv.y;

            let color = field.sample(Vec2::new(u, v));
            let mut direction = color * 2.0 - Vec3::ONE;
            direction.y *= 0.2;

            let phase = i as f32;
            let gust = 0.6 + 0.4 * (t * 2.0 + u * 5.0 + v * 3.0 + phase * 0.01).sin();
            let jitter = 0.9 + 0.2 * (t * 5.0 + phase).sin();
            let noise = 0.8 + 0.4 * noise2(u * 10.0 + t, v * 10.0 + t);

            let magnitude = (strength * gust * jitter * noise).powf(WIND_EXPONENT);
            point.force += direction.normalize_or_zero() * magnitude;
        }
    }
}
