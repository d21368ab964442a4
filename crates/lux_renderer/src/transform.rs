//! Instancing wrappers: translate, rotate about Y, and flip-face.
//!
//! Each wrapper owns one child and moves the query into the child's frame.
//! Light-sampling queries are forwarded the same way, so a transformed
//! shape can sit in the light set.

use std::sync::Arc;

use lux_math::{degrees_to_radians, Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};

/// Moves its child by a fixed offset.
#[derive(Clone)]
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: impl Hittable + 'static, offset: Vec3) -> Self {
        Self::from_shared(Arc::new(object), offset)
    }

    pub fn from_shared(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self { object, offset }
    }
}

impl Hittable for Translate {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        rng: &mut dyn RngCore,
    ) -> bool {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        if !self.object.hit(&moved, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        let outward = rec.outward_normal();
        rec.set_face_normal(ray, outward);

        true
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.object
            .bounding_box(time)
            .map(|bbox| bbox.translate(self.offset))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }

    fn is_degenerate(&self) -> bool {
        self.object.is_degenerate()
    }
}

/// Rotates its child about the world Y axis.
#[derive(Clone)]
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    /// Child bounds rotated into world space, computed once
    bbox: Option<Aabb>,
}

impl RotateY {
    /// `angle` is in degrees; positive turns +X toward -Z.
    pub fn new(object: impl Hittable + 'static, angle: f32, time: Interval) -> Self {
        Self::from_shared(Arc::new(object), angle, time)
    }

    pub fn from_shared(object: Arc<dyn Hittable>, angle: f32, time: Interval) -> Self {
        let radians = degrees_to_radians(angle);
        let bbox = object
            .bounding_box(time)
            .map(|bbox| Mat4::from_rotation_y(radians).transform_aabb(&bbox));

        Self {
            object,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
            bbox,
        }
    }

    #[inline]
    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        rng: &mut dyn RngCore,
    ) -> bool {
        let rotated = Ray::new(
            self.to_local(ray.origin()),
            self.to_local(ray.direction()),
            ray.time(),
        );
        if !self.object.hit(&rotated, ray_t, rec, rng) {
            return false;
        }

        rec.p = self.to_world(rec.p);
        let outward = self.to_world(rec.outward_normal());
        rec.set_face_normal(ray, outward);

        true
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.to_local(origin), self.to_local(direction))
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world(self.object.random(self.to_local(origin), rng))
    }

    fn is_degenerate(&self) -> bool {
        self.object.is_degenerate()
    }
}

/// Inverts which side of its child counts as the front face.
#[derive(Clone)]
pub struct FlipFace {
    object: Arc<dyn Hittable>,
}

impl FlipFace {
    pub fn new(object: impl Hittable + 'static) -> Self {
        Self {
            object: Arc::new(object),
        }
    }
}

impl Hittable for FlipFace {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.object.hit(ray, ray_t, rec, rng) {
            return false;
        }

        rec.front_face = !rec.front_face;
        true
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.object.bounding_box(time)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin, rng)
    }

    fn is_degenerate(&self) -> bool {
        self.object.is_degenerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MaterialId;
    use crate::rect::AaRect;
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const T: Interval = Interval::new(0.001, f32::INFINITY);
    const SHUTTER: Interval = Interval::new(0.0, 1.0);

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_translate_round_trip() {
        let offset = Vec3::new(3.0, -2.0, 7.0);
        let sphere = Sphere::new(Vec3::ZERO, 1.0, MaterialId::NONE);
        let moved = Translate::new(sphere.clone(), offset);
        let mut rng = StdRng::seed_from_u64(0);

        let world_ray = Ray::new_simple(Vec3::new(3.5, -1.8, -10.0), Vec3::Z);
        let mut world_rec = HitRecord::default();
        assert!(moved.hit(&world_ray, T, &mut world_rec, &mut rng));

        // Same ray expressed in the sphere's frame
        let local_ray = Ray::new_simple(world_ray.origin() - offset, Vec3::Z);
        let mut local_rec = HitRecord::default();
        assert!(sphere.hit(&local_ray, T, &mut local_rec, &mut rng));

        assert!(approx(local_rec.p + offset, world_rec.p));
        assert!((local_rec.t - world_rec.t).abs() < 1e-4);
        assert_eq!(local_rec.front_face, world_rec.front_face);
        assert!(approx(local_rec.normal, world_rec.normal));

        let bbox = moved.bounding_box(SHUTTER).unwrap();
        assert!(approx(bbox.centroid(), offset));
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let rect = AaRect::xy(-1.0, 2.0, -1.0, 1.0, -5.0, MaterialId::NONE);
        let rotated = RotateY::new(rect.clone(), 0.0, SHUTTER);
        let mut rng = StdRng::seed_from_u64(0);

        let rays = [
            Ray::new_simple(Vec3::ZERO, -Vec3::Z),
            Ray::new_simple(Vec3::new(1.0, 0.5, 0.0), Vec3::new(0.1, -0.1, -1.0)),
            Ray::new_simple(Vec3::new(0.0, 0.0, -10.0), Vec3::Z),
        ];
        for ray in rays {
            let mut a = HitRecord::default();
            let mut b = HitRecord::default();
            assert!(rect.hit(&ray, T, &mut a, &mut rng));
            assert!(rotated.hit(&ray, T, &mut b, &mut rng));

            assert!(approx(a.p, b.p));
            assert!(approx(a.normal, b.normal));
            assert_eq!(a.front_face, b.front_face);
            assert!((a.t - b.t).abs() < 1e-5);
        }

        let original = rect.bounding_box(SHUTTER).unwrap();
        let turned = rotated.bounding_box(SHUTTER).unwrap();
        assert!(approx(original.min(), turned.min()));
        assert!(approx(original.max(), turned.max()));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        // +90 degrees maps local +X to world -Z
        let sphere = Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, MaterialId::NONE);
        let rotated = RotateY::new(sphere, 90.0, SHUTTER);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        assert!(rotated.hit(&ray, T, &mut rec, &mut rng));
        assert!(approx(rec.p, Vec3::new(0.0, 0.0, -4.0)));
        assert!(rec.front_face);
        assert!(approx(rec.normal, Vec3::Z));

        let bbox = rotated.bounding_box(SHUTTER).unwrap();
        assert!(approx(bbox.centroid(), Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_rotate_forwards_light_sampling() {
        let rect = AaRect::xz(-1.0, 1.0, -1.0, 1.0, 3.0, MaterialId::NONE);
        let rotated = RotateY::new(rect, 30.0, SHUTTER);
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..50 {
            let d = rotated.random(Vec3::ZERO, &mut rng);
            assert!(d.y > 0.0);
            assert!(rotated.pdf_value(Vec3::ZERO, d) > 0.0);
        }
    }

    #[test]
    fn test_flip_face_inverts_front_face_only() {
        let rect = AaRect::xy(-1.0, 1.0, -1.0, 1.0, -2.0, MaterialId::NONE);
        let flipped = FlipFace::new(rect.clone());
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        let mut a = HitRecord::default();
        let mut b = HitRecord::default();
        assert!(rect.hit(&ray, T, &mut a, &mut rng));
        assert!(flipped.hit(&ray, T, &mut b, &mut rng));

        assert_eq!(a.front_face, !b.front_face);
        assert_eq!(a.normal, b.normal);
        assert_eq!(a.t, b.t);
        assert_eq!(
            rect.bounding_box(SHUTTER).unwrap(),
            flipped.bounding_box(SHUTTER).unwrap()
        );
    }
}
