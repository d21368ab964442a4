//! Material trait for surface scattering.

use lux_core::{Color, TextureId, Textures};
use lux_math::{Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

use crate::hittable::HitRecord;
use crate::pdf::CosinePdf;
use crate::random::{gen_f32, random_in_unit_sphere};

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub enum ScatterRecord {
    /// Deterministic continuation (mirror, glass, phase-function sample).
    Specular { attenuation: Color, ray: Ray },
    /// Continuation sampled by the integrator, optionally mixed with light sampling.
    Diffuse { attenuation: Color, pdf: CosinePdf },
}

impl ScatterRecord {
    pub fn attenuation(&self) -> Color {
        match self {
            ScatterRecord::Specular { attenuation, .. } => *attenuation,
            ScatterRecord::Diffuse { attenuation, .. } => *attenuation,
        }
    }

    pub fn is_specular(&self) -> bool {
        matches!(self, ScatterRecord::Specular { .. })
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        textures: &Textures,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Density with which this material itself would scatter toward `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, _textures: &Textures) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: TextureId,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo texture.
    pub fn new(albedo: TextureId) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        textures: &Textures,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            attenuation: textures.value(self.albedo, rec.u, rec.v, rec.p),
            pdf: CosinePdf::new(rec.normal),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.direction().normalize_or_zero());
        if cosine < 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        _textures: &Textures,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        Some(ScatterRecord::Specular {
            attenuation: self.albedo,
            ray: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance. An index-matched interface
    /// reflects nothing.
    fn reflectance(cosine: f32, ratio: f32) -> f32 {
        if ratio == 1.0 {
            return 0.0;
        }
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        _textures: &Textures,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord::Specular {
            attenuation: Color::ONE,
            ray: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Phase function of a participating medium: scatters uniformly.
#[derive(Debug, Clone)]
pub struct Isotropic {
    albedo: TextureId,
}

impl Isotropic {
    pub fn new(albedo: TextureId) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        textures: &Textures,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Specular {
            attenuation: textures.value(self.albedo, rec.u, rec.v, rec.p),
            ray: Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time()),
        })
    }
}

/// Diffuse light emitter. Emits from its front face only.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: TextureId,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission texture.
    pub fn new(emit: TextureId) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _textures: &Textures,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord, textures: &Textures) -> Color {
        if rec.front_face {
            textures.value(self.emit, rec.u, rec.v, rec.p)
        } else {
            Color::ZERO
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
