//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree of bounding boxes. Each node splits along a randomly chosen
//! axis at the median of its objects' box minima.

use std::cmp::Ordering;
use std::sync::Arc;

use lux_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};

use crate::error::{SceneError, SceneResult};
use crate::hittable::{HitRecord, Hittable, HittableList};

/// A primitive paired with its bounds, computed once at build time.
type Entry = (Aabb, Arc<dyn Hittable>);

/// BVH node with two children.
///
/// A single object is stored in both children, so traversal never needs a
/// leaf special case.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH from a list of hittable objects.
    ///
    /// Fails if the list is empty or any object is unbounded over `time`.
    pub fn new(list: &HittableList, time: Interval, rng: &mut dyn RngCore) -> SceneResult<Self> {
        if list.is_empty() {
            return Err(SceneError::EmptyBvh);
        }

        let mut entries = list
            .objects()
            .iter()
            .enumerate()
            .map(|(index, object)| {
                object
                    .bounding_box(time)
                    .map(|bbox| (bbox, Arc::clone(object)))
                    .ok_or(SceneError::MissingBoundingBox {
                        index,
                        kind: object.kind(),
                    })
            })
            .collect::<SceneResult<Vec<Entry>>>()?;

        let node = Self::build(&mut entries, rng);
        log::debug!("Built BVH over {} objects", list.len());
        Ok(node)
    }

    /// Recursive construction over a non-empty slice.
    fn build(entries: &mut [Entry], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        let compare = |a: &Entry, b: &Entry| box_compare(&a.0, &b.0, axis);

        let (left, right): (Entry, Entry) = match entries.len() {
            1 => (entries[0].clone(), entries[0].clone()),
            2 => {
                if compare(&entries[0], &entries[1]) == Ordering::Less {
                    (entries[0].clone(), entries[1].clone())
                } else {
                    (entries[1].clone(), entries[0].clone())
                }
            }
            len => {
                entries.sort_by(compare);
                let (lo, hi) = entries.split_at_mut(len / 2);
                let left = Self::build(lo, rng);
                let right = Self::build(hi, rng);
                (
                    (left.bbox, Arc::new(left) as Arc<dyn Hittable>),
                    (right.bbox, Arc::new(right) as Arc<dyn Hittable>),
                )
            }
        };

        Self {
            bbox: Aabb::surrounding(&left.0, &right.0),
            left: left.1,
            right: right.1,
        }
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }
}

fn box_compare(a: &Aabb, b: &Aabb, axis: usize) -> Ordering {
    a.axis_interval(axis)
        .min
        .partial_cmp(&b.axis_interval(axis).min)
        .unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec, rng);

        // Only check right up to closest hit
        let right_max = if hit_left { rec.t } else { ray_t.max };
        let hit_right = self
            .right
            .hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

        hit_left || hit_right
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MaterialId;
    use crate::cuboid::Cuboid;
    use crate::random::{random_unit_vector, random_vec3};
    use crate::rect::AaRect;
    use crate::sphere::Sphere;
    use crate::transform::{RotateY, Translate};
    use lux_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SHUTTER: Interval = Interval::new(0.0, 1.0);
    const T: Interval = Interval::new(0.001, f32::INFINITY);

    /// An object with no bounds, standing in for an infinite plane.
    struct Unbounded;

    impl Hittable for Unbounded {
        fn hit(&self, _: &Ray, _: Interval, _: &mut HitRecord, _: &mut dyn RngCore) -> bool {
            false
        }

        fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
            None
        }
    }

    #[test]
    fn test_bvh_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = BvhNode::new(&HittableList::new(), SHUTTER, &mut rng);
        assert!(matches!(result, Err(SceneError::EmptyBvh)));
    }

    #[test]
    fn test_bvh_reports_unbounded_object() {
        let mut list = HittableList::new();
        list.add(Sphere::new(Vec3::ZERO, 1.0, MaterialId::NONE));
        list.add(Unbounded);

        let mut rng = StdRng::seed_from_u64(0);
        match BvhNode::new(&list, SHUTTER, &mut rng) {
            Err(SceneError::MissingBoundingBox { index, kind }) => {
                assert_eq!(index, 1);
                assert!(kind.ends_with("Unbounded"), "{kind}");
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected a construction error"),
        }
    }

    #[test]
    fn test_bvh_single_sphere() {
        let mut list = HittableList::new();
        list.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId::NONE));

        let mut rng = StdRng::seed_from_u64(0);
        let bvh = BvhNode::new(&list, SHUTTER, &mut rng).unwrap();

        // Test ray hit
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, T, &mut rec, &mut rng));
        assert!((rec.t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let mut list = HittableList::new();
        for i in 0..10 {
            list.add(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, MaterialId::NONE));
        }

        let mut rng = StdRng::seed_from_u64(1);
        let bvh = BvhNode::new(&list, SHUTTER, &mut rng).unwrap();

        // Test ray that hits sphere at x=5
        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, T, &mut rec, &mut rng));

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_bbox_contains_children() {
        let mut list = HittableList::new();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..40 {
            list.add(Sphere::new(random_vec3(&mut rng, -20.0, 20.0), 1.0, MaterialId::NONE));
        }
        let bvh = BvhNode::new(&list, SHUTTER, &mut rng).unwrap();
        let all = list.bounding_box(SHUTTER).unwrap();

        assert!(bvh.bbox().contains_box(&all));
        assert!(all.contains_box(&bvh.bbox()));
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut list = HittableList::new();

        for _ in 0..60 {
            let center = random_vec3(&mut rng, -10.0, 10.0);
            list.add(Sphere::new(center, 0.3 + 0.7 * rng.gen::<f32>(), MaterialId::NONE));
        }
        for _ in 0..10 {
            let corner = random_vec3(&mut rng, -10.0, 10.0);
            let cube = Cuboid::new(corner, corner + Vec3::splat(1.5), MaterialId::NONE);
            list.add(Translate::new(
                RotateY::new(cube, 37.0, SHUTTER),
                Vec3::new(0.5, 0.0, -0.5),
            ));
        }
        list.add(AaRect::xz(-10.0, 10.0, -10.0, 10.0, -11.0, MaterialId::NONE));

        let bvh = BvhNode::new(&list, SHUTTER, &mut rng).unwrap();

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = random_vec3(&mut rng, -15.0, 15.0);
            let ray = Ray::new_simple(origin, random_unit_vector(&mut rng));

            let mut linear = HitRecord::default();
            let mut accel = HitRecord::default();
            let hit_linear = list.hit(&ray, T, &mut linear, &mut rng);
            let hit_accel = bvh.hit(&ray, T, &mut accel, &mut rng);

            assert_eq!(hit_linear, hit_accel, "ray {ray:?}");
            if hit_linear {
                hits += 1;
                assert!((linear.t - accel.t).abs() < 1e-4, "ray {ray:?}");
                assert!((linear.p - accel.p).length() < 1e-3);
                assert_eq!(linear.front_face, accel.front_face);
            }
        }
        assert!(hits > 100);
    }
}
