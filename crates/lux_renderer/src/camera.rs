//! Camera for ray generation.

use lux_math::{degrees_to_radians, Ray, Vec3};
use rand::RngCore;

use crate::random::{gen_range_f32, random_in_unit_disk};

/// Thin-lens camera with a shutter interval.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,       // Vertical field of view in degrees
    aperture: f32,   // Lens diameter; 0 is a pinhole
    focus_dist: f32, // Distance from camera to plane of perfect focus

    // Shutter open/close times
    time0: f32,
    time1: f32,

    // Cached computed values (set by initialize())
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 600,
            image_height: 600,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            // Cached values (initialized to defaults)
            origin: Vec3::ZERO,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self
    }

    /// Set the interval ray times are drawn from.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height.max(1) as f32
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.origin = self.look_from;
        self.lens_radius = self.aperture / 2.0;

        let theta = degrees_to_radians(self.vfov);
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect_ratio() * half_height;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        self.lower_left_corner = self.origin
            - half_width * self.focus_dist * self.u
            - half_height * self.focus_dist * self.v
            - self.focus_dist * self.w;
        self.horizontal = 2.0 * half_width * self.focus_dist * self.u;
        self.vertical = 2.0 * half_height * self.focus_dist * self.v;
    }

    /// Ray through image-plane coordinates `(s, t)` in [0, 1]^2.
    ///
    /// `s` grows to the right and `t` upward. The origin is jittered over the
    /// lens and the time is drawn from the shutter interval.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        let direction = self.lower_left_corner + s * self.horizontal + t * self.vertical
            - self.origin
            - offset;
        let time = if self.time1 > self.time0 {
            gen_range_f32(rng, self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(self.origin + offset, direction, time)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
