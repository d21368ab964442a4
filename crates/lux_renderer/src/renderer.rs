//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a fixed depth cutoff
//! - Light importance sampling mixed with the material's own density
//! - Stratified anti-aliasing and gamma correction

use lux_core::Color;
use lux_math::{Interval, Ray};
use rand::RngCore;

use crate::bucket::{generate_buckets, render_bucket};
use crate::camera::Camera;
use crate::hittable::HitRecord;
use crate::material::ScatterRecord;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::random::gen_f32;
use crate::scene::Scene;

/// Closest accepted hit distance; avoids re-hitting the surface a ray left.
pub const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel, rounded down to a square number when stratifying
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed for the per-bucket random streams
    pub seed: u64,
    /// Bucket (tile) edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0x5eed,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Strata per pixel side: `floor(sqrt(samples_per_pixel))`, at least 1.
    pub fn strata(&self) -> u32 {
        ((self.samples_per_pixel as f64).sqrt() as u32).max(1)
    }
}

/// Compute the radiance carried back along `ray`.
///
/// This is the core path tracing function. Diffuse bounces sample the
/// scene's light set and the material's cosine lobe half of the time each,
/// weighting by the mixed density.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !scene
        .world
        .hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec, rng)
    {
        return scene.background.color(ray);
    }

    // Geometry without a material absorbs everything
    let Some(material) = scene.assets.material(rec.material) else {
        return Color::ZERO;
    };

    let textures = &scene.assets.textures;
    let emitted = material.emitted(ray, &rec, textures);

    let Some(srec) = material.scatter(ray, &rec, textures, rng) else {
        return emitted;
    };

    match srec {
        ScatterRecord::Specular {
            attenuation,
            ray: specular,
        } => attenuation * ray_color(&specular, scene, depth - 1, rng),

        ScatterRecord::Diffuse { attenuation, pdf } => {
            let (direction, pdf_val) = match &scene.lights {
                Some(lights) => {
                    let light_pdf = HittablePdf::new(lights, rec.p);
                    let mixture = MixturePdf::new(&light_pdf, &pdf);
                    let direction = mixture.generate(rng);
                    (direction, mixture.value(direction))
                }
                None => {
                    let direction = pdf.generate(rng);
                    (direction, pdf.value(direction))
                }
            };

            // A zero or broken density carries no usable estimate
            if !(pdf_val > 0.0 && pdf_val.is_finite()) {
                return emitted;
            }

            let scattered = Ray::new(rec.p, direction, ray.time());
            let scattering_pdf = material.scattering_pdf(ray, &rec, &scattered);
            if scattering_pdf <= 0.0 {
                return emitted;
            }

            emitted
                + attenuation * scattering_pdf * ray_color(&scattered, scene, depth - 1, rng)
                    / pdf_val
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    // Apply gamma correction and convert to 0-255
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Replace NaN / infinite channels with zero.
#[inline]
fn finite_or_zero(c: Color) -> Color {
    let fix = |x: f32| if x.is_finite() { x } else { 0.0 };
    Color::new(fix(c.x), fix(c.y), fix(c.z))
}

/// Render a single pixel with stratified multi-sampling.
///
/// Pixel `(x, y)` uses image coordinates: `y = 0` is the top row.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let n = config.strata();
    let inv_n = 1.0 / n as f32;
    let width = camera.image_width as f32;
    let height = camera.image_height as f32;
    let row = (camera.image_height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;
    for sy in 0..n {
        for sx in 0..n {
            let s = (x as f32 + (sx as f32 + gen_f32(rng)) * inv_n) / width;
            let t = (row + (sy as f32 + gen_f32(rng)) * inv_n) / height;

            let ray = camera.get_ray(s, t, rng);
            let sample = ray_color(&ray, scene, config.max_depth, rng);
            if !sample.is_finite() {
                log::trace!("Discarding non-finite sample {sample:?} at ({x}, {y})");
            }
            pixel_color += finite_or_zero(sample);
        }
    }

    // Average the samples
    pixel_color / (n * n) as f32
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Gamma-corrected 8-bit image, ready to be saved.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y)))
        })
    }
}

/// Render the entire scene to an image buffer on the calling thread.
///
/// Buckets are visited in the same order and with the same random streams as
/// [`crate::render_parallel`], so both produce identical pixels.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for bucket in generate_buckets(camera.image_width, camera.image_height, config.bucket_size) {
        let result = render_bucket(&bucket, camera, scene, config);
        result.write_into(&mut image);
    }

    image
}
