//! Lux renderer - CPU Monte Carlo path tracing.
//!
//! Geometry, materials and sampling densities for an importance-sampled
//! path tracer, plus a bucketed parallel render loop.

mod assets;
mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod material;
mod medium;
mod pdf;
pub mod random;
mod rect;
mod renderer;
mod scene;
mod sphere;
mod transform;

pub use assets::{Assets, MaterialId};
pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use error::{SceneError, SceneResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterRecord,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf};
pub use rect::{AaRect, Plane};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer, RenderConfig,
    T_MIN,
};
pub use scene::{Background, Scene};
pub use sphere::{MovingSphere, Sphere};
pub use transform::{FlipFace, RotateY, Translate};

/// Re-export the shared math and color types
pub use lux_core::Color;
pub use lux_math::{Aabb, Interval, Ray, Vec3};
