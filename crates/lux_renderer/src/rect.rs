//! Axis-aligned rectangles.

use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::assets::MaterialId;
use crate::hittable::{HitRecord, Hittable};
use crate::random::gen_range_f32;

/// Thickness added along the fixed axis so the bounding box is never flat.
const RECT_PAD: f32 = 0.0001;

/// Which pair of axes a rectangle spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans x and y at fixed z.
    XY,
    /// Spans x and z at fixed y.
    XZ,
    /// Spans y and z at fixed x.
    YZ,
}

impl Plane {
    /// `(a, b, k)` axis indices: the two spanned axes and the fixed one.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

/// Rectangle `[a0, a1] x [b0, b1]` lying in the plane `k` of its fixed axis.
///
/// The outward normal is the positive fixed axis.
#[derive(Debug, Clone)]
pub struct AaRect {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: MaterialId,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: MaterialId,
    ) -> Self {
        Self {
            plane,
            a0: a0.min(a1),
            a1: a0.max(a1),
            b0: b0.min(b1),
            b1: b0.max(b1),
            k,
            material,
        }
    }

    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: MaterialId) -> Self {
        Self::new(Plane::XY, (x0, x1), (y0, y1), k, material)
    }

    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: MaterialId) -> Self {
        Self::new(Plane::XZ, (x0, x1), (z0, z1), k, material)
    }

    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: MaterialId) -> Self {
        Self::new(Plane::YZ, (y0, y1), (z0, z1), k, material)
    }

    pub fn area(&self) -> f32 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }

    fn normal(&self) -> Vec3 {
        let (_, _, k) = self.plane.axes();
        let mut n = Vec3::ZERO;
        n[k] = 1.0;
        n
    }

    /// Build a point from in-plane coordinates.
    fn point(&self, a: f32, b: f32) -> Vec3 {
        let (ia, ib, ik) = self.plane.axes();
        let mut p = Vec3::ZERO;
        p[ia] = a;
        p[ib] = b;
        p[ik] = self.k;
        p
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        let t = (self.k - origin[ik]) / direction[ik];
        if !t.is_finite() || !ray_t.contains(t) {
            return false;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return false;
        }

        rec.u = (a - self.a0) / (self.a1 - self.a0);
        rec.v = (b - self.b0) / (self.b1 - self.b0);
        rec.t = t;
        rec.set_face_normal(ray, self.normal());
        rec.material = self.material;
        rec.p = ray.at(t);

        true
    }
}

impl Hittable for AaRect {
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
        let mut lo = self.point(self.a0, self.b0);
        let mut hi = self.point(self.a1, self.b1);
        let (_, _, k) = self.plane.axes();
        lo[k] -= RECT_PAD;
        hi[k] += RECT_PAD;
        Some(Aabb::from_points(lo, hi))
    }

    /// Converts the uniform area density into solid angle as seen from `origin`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let mut rec = HitRecord::default();
        let ray = Ray::new_simple(origin, direction);
        if !self.intersect(&ray, Interval::new(0.001, f32::INFINITY), &mut rec) {
            return 0.0;
        }

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();
        let pdf = distance_squared / (cosine * self.area());

        if pdf.is_finite() {
            pdf
        } else {
            0.0
        }
    }

    fn is_degenerate(&self) -> bool {
        self.area() <= 0.0
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a = gen_range_f32(rng, self.a0, self.a1);
        let b = gen_range_f32(rng, self.b0, self.b1);
        self.point(a, b) - origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rect_hit_and_uv() {
        let rect = AaRect::xz(-1.0, 1.0, -1.0, 1.0, 5.0, MaterialId::NONE);
        let ray = Ray::new_simple(Vec3::new(0.5, 0.0, 0.0), Vec3::Y);
        let mut rec = HitRecord::default();

        assert!(rect.intersect(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 5.0).abs() < 1e-5);
        assert!((rec.u - 0.75).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
        // Hitting the +Y normal from below is the back face
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Y);
    }

    #[test]
    fn test_rect_miss_outside_and_parallel() {
        let rect = AaRect::xy(0.0, 1.0, 0.0, 1.0, -2.0, MaterialId::NONE);
        let mut rec = HitRecord::default();
        let t = Interval::new(0.001, f32::INFINITY);

        let outside = Ray::new_simple(Vec3::new(2.0, 0.5, 0.0), -Vec3::Z);
        assert!(!rect.intersect(&outside, t, &mut rec));

        let parallel = Ray::new_simple(Vec3::new(0.5, 0.5, 0.0), Vec3::X);
        assert!(!rect.intersect(&parallel, t, &mut rec));
    }

    #[test]
    fn test_rect_bounding_box_is_padded() {
        for rect in [
            AaRect::xy(0.0, 2.0, 0.0, 3.0, 1.0, MaterialId::NONE),
            AaRect::xz(0.0, 2.0, 0.0, 3.0, 1.0, MaterialId::NONE),
            AaRect::yz(0.0, 2.0, 0.0, 3.0, 1.0, MaterialId::NONE),
        ] {
            let bbox = rect.bounding_box(Interval::new(0.0, 1.0)).unwrap();
            for axis in 0..3 {
                assert!(bbox.axis_interval(axis).size() > 0.0);
            }
        }
    }

    #[test]
    fn test_rect_light_sampling_all_planes() {
        let mut rng = StdRng::seed_from_u64(21);
        let rects = [
            AaRect::xz(-1.0, 1.0, -1.0, 1.0, 4.0, MaterialId::NONE),
            AaRect::xy(-1.0, 1.0, -1.0, 1.0, 4.0, MaterialId::NONE),
            AaRect::yz(-1.0, 1.0, -1.0, 1.0, 4.0, MaterialId::NONE),
        ];

        for rect in rects {
            for _ in 0..50 {
                let d = rect.random(Vec3::ZERO, &mut rng);
                let pdf = rect.pdf_value(Vec3::ZERO, d);
                // Straight on: at least dist^2 / area
                assert!(pdf >= 16.0 / 4.0 - 1e-3, "pdf {pdf}");
                assert!(pdf.is_finite());
            }
        }
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(AaRect::yz(1.0, 1.0, 0.0, 1.0, 0.0, MaterialId::NONE).is_degenerate());
        assert!(AaRect::xz(0.0, 1.0, 3.0, 3.0, 0.0, MaterialId::NONE).is_degenerate());
        assert!(!AaRect::xy(0.0, 1.0, 0.0, 1.0, 0.0, MaterialId::NONE).is_degenerate());
    }

    #[test]
    fn test_rect_pdf_head_on() {
        let rect = AaRect::xz(-1.0, 1.0, -1.0, 1.0, 2.0, MaterialId::NONE);
        let pdf = rect.pdf_value(Vec3::ZERO, Vec3::Y);
        assert!((pdf - 1.0).abs() < 1e-5);
        assert_eq!(rect.pdf_value(Vec3::ZERO, -Vec3::Y), 0.0);
    }
}
