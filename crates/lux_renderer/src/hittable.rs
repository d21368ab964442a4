//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::{Rng, RngCore};

use crate::assets::MaterialId;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: MaterialId,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    /// The geometric (outward) normal this record was built from.
    #[inline]
    pub fn outward_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Trait for objects that can be hit by rays.
///
/// The light-sampling methods default to "not a light": zero density and an
/// arbitrary direction.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record. `rng` is only drawn
    /// from by stochastic geometry such as participating media.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord, rng: &mut dyn RngCore)
        -> bool;

    /// Bounds over the shutter interval `time`, or `None` for unbounded geometry.
    fn bounding_box(&self, time: Interval) -> Option<Aabb>;

    /// Solid-angle density of sampling `direction` from `origin` toward this object.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// A direction from `origin` toward a random point of this object.
    fn random(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }

    /// True when light sampling toward this object has nothing to aim at,
    /// such as a rectangle or sphere with zero area.
    fn is_degenerate(&self) -> bool {
        false
    }

    /// Concrete type name, used in construction diagnostics.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A list of hittable objects.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Hittable + 'static) {
        self.objects.push(Arc::new(object));
    }

    /// Add an object that is already shared elsewhere.
    pub fn add_shared(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl From<Vec<Arc<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Arc<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut temp_rec = HitRecord::default();
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, &mut temp_rec, rng) {
                hit_anything = true;
                closest_so_far = temp_rec.t;
                *rec = temp_rec;
            }
        }

        hit_anything
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        let mut objects = self.objects.iter();
        let first = objects.next()?.bounding_box(time)?;

        objects.try_fold(first, |acc, object| {
            object
                .bounding_box(time)
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }

    /// Equal-weight average of the members' densities.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn is_degenerate(&self) -> bool {
        self.objects.iter().any(|object| object.is_degenerate())
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::ZERO;
        }

        let index = rng.gen_range(0..self.objects.len());
        self.objects[index].random(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, MaterialId::NONE)
    }

    #[test]
    fn test_set_face_normal() {
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        rec.set_face_normal(&ray, Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);

        rec.set_face_normal(&ray, -Vec3::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.outward_normal(), -Vec3::Z);
    }

    #[test]
    fn test_list_closest_hit() {
        let mut list = HittableList::new();
        list.add(sphere(Vec3::new(0.0, 0.0, -10.0), 1.0));
        list.add(sphere(Vec3::new(0.0, 0.0, -4.0), 1.0));
        list.add(sphere(Vec3::new(0.0, 0.0, -7.0), 1.0));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_list_bounding_box_covers_every_member() {
        let mut list = HittableList::new();
        assert!(list.bounding_box(Interval::new(0.0, 1.0)).is_none());

        list.add(sphere(Vec3::new(-5.0, 0.0, 0.0), 1.0));
        list.add(sphere(Vec3::new(5.0, 2.0, 0.0), 1.0));
        list.add(sphere(Vec3::new(0.0, 0.0, 9.0), 0.5));

        let bbox = list.bounding_box(Interval::new(0.0, 1.0)).unwrap();
        assert_eq!(bbox.min(), Vec3::new(-6.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(6.0, 3.0, 9.5));
    }

    #[test]
    fn test_list_pdf_value_is_average() {
        let a = sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let b = sphere(Vec3::new(0.0, 0.0, -3.0), 2.0);
        let direction = Vec3::new(0.0, 0.0, -1.0);
        let expected = 0.5 * (a.pdf_value(Vec3::ZERO, direction) + b.pdf_value(Vec3::ZERO, direction));

        let mut list = HittableList::new();
        list.add(a);
        list.add(b);

        assert!((list.pdf_value(Vec3::ZERO, direction) - expected).abs() < 1e-5);
        assert_eq!(HittableList::new().pdf_value(Vec3::ZERO, direction), 0.0);
    }

    #[test]
    fn test_list_random_targets_a_member() {
        let mut list = HittableList::new();
        list.add(sphere(Vec3::new(0.0, 10.0, 0.0), 1.0));
        list.add(sphere(Vec3::new(0.0, -10.0, 0.0), 1.0));

        let mut rng = StdRng::seed_from_u64(5);
        let (mut up, mut down) = (0, 0);
        for _ in 0..200 {
            let d = list.random(Vec3::ZERO, &mut rng);
            if d.y > 0.0 {
                up += 1;
            } else {
                down += 1;
            }
            assert!(list.pdf_value(Vec3::ZERO, d) > 0.0);
        }
        assert!(up > 0 && down > 0);
    }
}
