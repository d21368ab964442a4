// Bounding-box helpers on top of glam::Mat4.
//
// glam already provides transform_point3 / transform_vector3; the only thing
// missing for instancing wrappers is re-bounding a box under a matrix.

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 used when wrapping geometry in a transform.
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut lo = Vec3::splat(f32::INFINITY);
        let mut hi = Vec3::splat(f32::NEG_INFINITY);

        for corner in aabb.corners() {
            let p = self.transform_point3(corner);
            lo = lo.min(p);
            hi = hi.max(p);
        }

        Aabb::from_points(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 5.0));
        let out = Mat4::IDENTITY.transform_aabb(&aabb);

        assert!(approx(out.min(), aabb.min()));
        assert!(approx(out.max(), aabb.max()));
    }

    #[test]
    fn test_transform_aabb_translation() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let out = Mat4::from_translation(Vec3::new(10.0, 0.0, -2.0)).transform_aabb(&aabb);

        assert!(approx(out.min(), Vec3::new(10.0, 0.0, -2.0)));
        assert!(approx(out.max(), Vec3::new(11.0, 1.0, -1.0)));
    }

    #[test]
    fn test_transform_aabb_rotation_y() {
        // A 2x1x1 box turned a quarter about Y swaps its x and z extents.
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let rot = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let out = rot.transform_aabb(&aabb);

        assert!((out.x.size() - 1.0).abs() < 1e-4);
        assert!((out.z.size() - 2.0).abs() < 1e-4);
        assert!((out.y.size() - 1.0).abs() < 1e-4);
    }
}
