//! A renderable scene: geometry, optional light set, assets and background.

use std::sync::Arc;

use lux_core::Color;
use lux_math::{Interval, Ray};

use crate::assets::Assets;
use crate::error::{SceneError, SceneResult};
use crate::hittable::{Hittable, HittableList};

/// Radiance returned for rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Vertical white-to-blue gradient.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Everything the integrator reads. Immutable once built.
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    /// Shapes to importance-sample; `None` samples materials only
    pub lights: Option<HittableList>,
    pub assets: Assets,
    pub background: Background,
}

impl Scene {
    pub fn new(world: impl Hittable + 'static, assets: Assets, background: Background) -> Self {
        Self {
            world: Arc::new(world),
            lights: None,
            assets,
            background,
        }
    }

    /// Attach a light set. Every light must be bounded over `time` and have a
    /// surface to sample.
    pub fn with_lights(mut self, lights: HittableList, time: Interval) -> SceneResult<Self> {
        if lights.is_empty() {
            return Err(SceneError::EmptyLightSet);
        }

        for (index, light) in lights.objects().iter().enumerate() {
            if light.bounding_box(time).is_none() {
                return Err(SceneError::LightMissingBoundingBox {
                    index,
                    kind: light.kind(),
                });
            }
            if light.is_degenerate() {
                return Err(SceneError::DegenerateLight {
                    index,
                    kind: light.kind(),
                });
            }
        }

        log::debug!("Light set with {} shapes", lights.len());
        self.lights = Some(lights);
        Ok(self)
    }
}
