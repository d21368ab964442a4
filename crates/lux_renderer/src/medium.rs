//! Constant-density participating medium.

use std::sync::Arc;

use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::assets::MaterialId;
use crate::error::{SceneError, SceneResult};
use crate::hittable::{HitRecord, Hittable};
use crate::random::gen_f32;

/// Nudge past the entry point when searching for the exit.
const EXIT_EPSILON: f32 = 0.0001;

/// Fog filling a convex boundary. Rays scatter at an exponentially
/// distributed depth inside it.
#[derive(Clone)]
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    /// Phase function, normally [`crate::Isotropic`]
    phase: MaterialId,
}

impl ConstantMedium {
    /// `boundary` must be convex; `density` must be positive and finite.
    pub fn new(boundary: impl Hittable + 'static, density: f32, phase: MaterialId) -> SceneResult<Self> {
        Self::from_shared(Arc::new(boundary), density, phase)
    }

    pub fn from_shared(
        boundary: Arc<dyn Hittable>,
        density: f32,
        phase: MaterialId,
    ) -> SceneResult<Self> {
        if !(density > 0.0 && density.is_finite()) {
            return Err(SceneError::InvalidDensity(density));
        }

        Ok(Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase,
        })
    }
}

impl Hittable for ConstantMedium {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut rec1 = HitRecord::default();
        let mut rec2 = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut rec1, rng) {
            return false;
        }

        let beyond_entry = Interval::new(rec1.t + EXIT_EPSILON, f32::INFINITY);
        if !self.boundary.hit(ray, beyond_entry, &mut rec2, rng) {
            return false;
        }

        let mut t_enter = rec1.t.max(ray_t.min);
        let t_exit = rec2.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        // ln(0) would be an infinite free flight
        let u = gen_f32(rng).max(f32::MIN_POSITIVE);
        let hit_distance = self.neg_inv_density * u.ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);

        rec.normal = Vec3::X; // arbitrary
        rec.front_face = true; // also arbitrary
        rec.material = self.phase;
        rec.u = 0.0;
        rec.v = 0.0;

        true
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.boundary.bounding_box(time)
    }
}
