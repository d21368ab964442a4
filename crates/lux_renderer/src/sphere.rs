//! Sphere primitives for ray tracing.

use lux_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

use crate::assets::MaterialId;
use crate::hittable::{HitRecord, Hittable};
use crate::random::{random_to_sphere, random_unit_vector};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Intersection without the rng plumbing; spheres are deterministic.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        hit_sphere(self.center, self.radius, self.material, ray, ray_t, rec)
    }
}

impl Hittable for Sphere {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        _rng: &mut dyn RngCore,
    ) -> bool {
        self.intersect(ray, ray_t, rec)
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        Some(self.bbox)
    }

    /// Reciprocal of the solid angle the sphere subtends from `origin`.
    ///
    /// From inside, the sphere surrounds the origin and every direction is
    /// sampled uniformly.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let mut rec = HitRecord::default();
        let ray = Ray::new_simple(origin, direction);
        if !self.intersect(&ray, Interval::new(0.001, f32::INFINITY), &mut rec) {
            return 0.0;
        }

        let dist_sq = (self.center - origin).length_squared();
        let radius_sq = self.radius * self.radius;
        if dist_sq < radius_sq {
            return 1.0 / (4.0 * PI);
        }

        let cos_theta_max = (1.0 - radius_sq / dist_sq).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn is_degenerate(&self) -> bool {
        self.radius <= 0.0
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        if distance_squared < self.radius * self.radius {
            return random_unit_vector(rng);
        }

        let uvw = Onb::from_w(direction);
        uvw.local_vec(random_to_sphere(self.radius, distance_squared, rng))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
#[derive(Debug, Clone)]
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: MaterialId,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: MaterialId,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at `time`. A zero-length motion interval pins it to `center0`.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span <= 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }

    fn bbox_at(&self, time: f32) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        let c = self.center(time);
        Aabb::from_points(c - rvec, c + rvec)
    }
}

impl Hittable for MovingSphere {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        _rng: &mut dyn RngCore,
    ) -> bool {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            self.material,
            ray,
            ray_t,
            rec,
        )
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        Some(Aabb::surrounding(
            &self.bbox_at(time.min),
            &self.bbox_at(time.max),
        ))
    }
}

fn hit_sphere(
    center: Vec3,
    radius: f32,
    material: MaterialId,
    ray: &Ray,
    ray_t: Interval,
    rec: &mut HitRecord,
) -> bool {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 {
        return false;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return false;
        }
    }

    rec.t = root;
    rec.p = ray.at(rec.t);
    let outward_normal = (rec.p - center) / radius;
    rec.set_face_normal(ray, outward_normal);
    (rec.u, rec.v) = sphere_uv(outward_normal);
    rec.material = material;

    true
}

/// UV coordinates for a point on the unit sphere.
///
/// u: angle around the Y axis, starting at -X. v: angle from -Y to +Y.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();

    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + PI / 2.0) / PI;
    (u, v)
}
