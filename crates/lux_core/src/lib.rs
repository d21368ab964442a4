//! Lux Core - textures and render settings shared by the renderer and the CLI.
//!
//! This crate provides:
//!
//! - **Textures**: solid, checker, Perlin marble and image lookups behind a
//!   single `Texture` enum, stored in an index-addressed `Textures` arena
//! - **Settings**: JSON-loadable render settings and the named scene list
//!
//! # Example
//!
//! ```ignore
//! use lux_core::{Settings, Textures};
//! use lux_math::Vec3;
//!
//! let settings = Settings::load("render.json")?;
//! let mut textures = Textures::new();
//! let red = textures.solid(Vec3::new(0.65, 0.05, 0.05));
//! ```

pub mod config;
pub mod perlin;
pub mod texture;

use lux_math::Vec3;

/// Linear RGB radiance / reflectance.
pub type Color = Vec3;

// Re-export commonly used types
pub use config::{ConfigError, SceneKind, Settings};
pub use perlin::Perlin;
pub use texture::{ImageTexture, NoiseTexture, Texture, TextureError, TextureId, Textures};
