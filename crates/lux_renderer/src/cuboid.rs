//! Axis-aligned box assembled from six rectangles.

use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::assets::MaterialId;
use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::rect::AaRect;
use crate::transform::FlipFace;

/// A box between two corners. Faces on the minimum corner's planes are
/// flipped so every face reports front-face hits from outside.
#[derive(Clone)]
pub struct Cuboid {
    box_min: Vec3,
    box_max: Vec3,
    sides: HittableList,
}

impl Cuboid {
    pub fn new(p0: Vec3, p1: Vec3, material: MaterialId) -> Self {
        let box_min = p0.min(p1);
        let box_max = p0.max(p1);
        let (lo, hi) = (box_min, box_max);

        let mut sides = HittableList::new();
        sides.add(AaRect::xy(lo.x, hi.x, lo.y, hi.y, hi.z, material));
        sides.add(FlipFace::new(AaRect::xy(lo.x, hi.x, lo.y, hi.y, lo.z, material)));

        sides.add(AaRect::xz(lo.x, hi.x, lo.z, hi.z, hi.y, material));
        sides.add(FlipFace::new(AaRect::xz(lo.x, hi.x, lo.z, hi.z, lo.y, material)));

        sides.add(AaRect::yz(lo.y, hi.y, lo.z, hi.z, hi.x, material));
        sides.add(FlipFace::new(AaRect::yz(lo.y, hi.y, lo.z, hi.z, lo.x, material)));

        Self {
            box_min,
            box_max,
            sides,
        }
    }
}

impl Hittable for Cuboid {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.sides.hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        Some(Aabb::from_points(self.box_min, self.box_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const T: Interval = Interval::new(0.001, f32::INFINITY);

    #[test]
    fn test_cuboid_front_faces_from_outside() {
        let cube = Cuboid::new(Vec3::splat(-1.0), Vec3::splat(1.0), MaterialId::NONE);
        let mut rng = StdRng::seed_from_u64(0);

        let directions = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
        for d in directions {
            let ray = Ray::new_simple(-5.0 * d, d);
            let mut rec = HitRecord::default();
            assert!(cube.hit(&ray, T, &mut rec, &mut rng));
            assert!((rec.t - 4.0).abs() < 1e-4, "{d:?}: t = {}", rec.t);
            assert!(rec.front_face, "{d:?}");
        }
    }

    #[test]
    fn test_cuboid_back_faces_from_inside() {
        let cube = Cuboid::new(Vec3::splat(-1.0), Vec3::splat(1.0), MaterialId::NONE);
        let mut rng = StdRng::seed_from_u64(0);

        for d in [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z] {
            let ray = Ray::new_simple(Vec3::ZERO, d);
            let mut rec = HitRecord::default();
            assert!(cube.hit(&ray, T, &mut rec, &mut rng));
            assert!((rec.t - 1.0).abs() < 1e-4);
            assert!(!rec.front_face, "{d:?}");
        }
    }

    #[test]
    fn test_cuboid_bounding_box_orders_corners() {
        let cube = Cuboid::new(Vec3::new(2.0, 3.0, 4.0), Vec3::ZERO, MaterialId::NONE);
        let bbox = cube.bounding_box(Interval::new(0.0, 1.0)).unwrap();
        assert_eq!(bbox.min(), Vec3::ZERO);
        assert_eq!(bbox.max(), Vec3::new(2.0, 3.0, 4.0));
    }
}
