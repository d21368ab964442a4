//! Direction sampling densities for importance sampling.

use lux_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

use crate::hittable::Hittable;
use crate::random::{gen_f32, random_cosine_direction};

/// A density over directions that can also be sampled.
pub trait Pdf {
    /// Density (per steradian) of generating `direction`.
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction distributed according to [`Pdf::value`].
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(w),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine = direction.normalize_or_zero().dot(self.uvw.w());
        cosine.max(0.0) / PI
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local_vec(random_cosine_direction(rng))
    }
}

/// Samples directions from `origin` toward a hittable (usually the light set).
pub struct HittablePdf<'a> {
    target: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(target: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { target, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.target.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.target.random(self.origin, rng)
    }
}

/// Even blend of two densities.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.p[0].value(direction) + 0.5 * self.p[1].value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.p[0].generate(rng)
        } else {
            self.p[1].generate(rng)
        }
    }
}
