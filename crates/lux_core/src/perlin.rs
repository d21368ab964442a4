//! Gradient Perlin noise used by the marble texture.

use lux_math::Vec3;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Default number of octaves summed by [`Perlin::turb`].
pub const TURBULENCE_DEPTH: u32 = 7;

/// Perlin noise generator with 256 random gradients and three permutation tables.
#[derive(Clone)]
pub struct Perlin {
    ranvec: Box<[Vec3; POINT_COUNT]>,
    perm_x: Box<[usize; POINT_COUNT]>,
    perm_y: Box<[usize; POINT_COUNT]>,
    perm_z: Box<[usize; POINT_COUNT]>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut ranvec = Box::new([Vec3::ZERO; POINT_COUNT]);
        for v in ranvec.iter_mut() {
            let r = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            // Reject the (practically impossible) zero vector
            *v = r.try_normalize().unwrap_or(Vec3::X);
        }

        Self {
            ranvec,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smoothed gradient noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let f = p.floor();
        let (u, v, w) = (p.x - f.x, p.y - f.y, p.z - f.z);
        let (i, j, k) = (f.x as i64, f.y as i64, f.z as i64);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[wrap(i + di as i64)]
                        ^ self.perm_y[wrap(j + dj as i64)]
                        ^ self.perm_z[wrap(k + dk as i64)];
                    *cell = self.ranvec[idx];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves of noise, absolute value.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

impl std::fmt::Debug for Perlin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Perlin").finish_non_exhaustive()
    }
}

#[inline]
fn wrap(i: i64) -> usize {
    (i & 255) as usize
}

fn generate_perm(rng: &mut dyn RngCore) -> Box<[usize; POINT_COUNT]> {
    let mut p = Box::new([0usize; POINT_COUNT]);
    for (i, slot) in p.iter_mut().enumerate() {
        *slot = i;
    }

    p.shuffle(rng);
    p
}

fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    // Hermite smoothing
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, grad) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * grad.dot(weight_v);
            }
        }
    }

    accum
}
