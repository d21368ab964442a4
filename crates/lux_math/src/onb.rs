use crate::Vec3;

/// Orthonormal basis built around a single direction `w`.
///
/// Used to move directions sampled around +Z (cosine lobes, sphere cones)
/// into world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Onb {
    axis: [Vec3; 3],
}

impl Onb {
    /// Build a right-handed basis whose third axis is `normalize(n)`.
    ///
    /// `n` must be non-zero.
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        let helper = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(helper).normalize();
        let u = v.cross(w);
        Self { axis: [u, v, w] }
    }

    #[inline]
    pub fn u(&self) -> Vec3 {
        self.axis[0]
    }

    #[inline]
    pub fn v(&self) -> Vec3 {
        self.axis[1]
    }

    #[inline]
    pub fn w(&self) -> Vec3 {
        self.axis[2]
    }

    /// `a*u + b*v + c*w`
    #[inline]
    pub fn local(&self, a: f32, b: f32, c: f32) -> Vec3 {
        a * self.u() + b * self.v() + c * self.w()
    }

    /// Map a vector expressed in basis coordinates to world space.
    #[inline]
    pub fn local_vec(&self, a: Vec3) -> Vec3 {
        self.local(a.x, a.y, a.z)
    }
}
