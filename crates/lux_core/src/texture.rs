//! Textures and the texture arena.
//!
//! Materials never own textures directly. They hold a [`TextureId`] into a
//! [`Textures`] table built alongside the scene, so one texture can back any
//! number of materials without reference counting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lux_math::Vec3;
use rand::RngCore;
use thiserror::Error;

use crate::perlin::{Perlin, TURBULENCE_DEPTH};
use crate::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {0} has no pixels")]
    Empty(PathBuf),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Index of a texture in a [`Textures`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A decoded image stored as linear RGB, row-major, top row first.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    pixels: Vec<Color>,

    /// Original file path (for debugging)
    pub path: String,
}

impl ImageTexture {
    /// Create an image texture from linear pixel data.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Color>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 || pixels.len() != (width as usize * height as usize) {
            return Err(TextureError::Empty(PathBuf::from(path)));
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Decode an image file, converting sRGB bytes to linear.
    pub fn load(path: &Path) -> TextureResult<Self> {
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| {
                Vec3::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        Self::new(width, height, pixels, path.to_string_lossy())
    }

    /// Nearest-pixel lookup. `(u, v)` are clamped to [0, 1], `v = 0` is the
    /// bottom row of the image.
    pub fn value(&self, u: f32, v: f32) -> Color {
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        self.pixels[(j * self.width + i) as usize]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Color>()
    }
}

/// Grey marble built from Perlin turbulence.
#[derive(Clone, Debug)]
pub struct NoiseTexture {
    noise: Perlin,
    pub scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }

    pub fn value(&self, p: Vec3) -> Color {
        let turb = self.noise.turb(p, TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + (self.scale * p.z + 10.0 * turb).sin())
    }
}

/// A pure `(u, v, p) -> color` lookup.
#[derive(Clone, Debug)]
pub enum Texture {
    Solid(Color),
    /// 3D checker; `sin(10x)·sin(10y)·sin(10z) < 0` selects `odd`.
    Checker {
        even: Box<Texture>,
        odd: Box<Texture>,
    },
    Noise(NoiseTexture),
    Image(ImageTexture),
}

impl Texture {
    pub fn checker(even: Color, odd: Color) -> Self {
        Texture::Checker {
            even: Box::new(Texture::Solid(even)),
            odd: Box::new(Texture::Solid(odd)),
        }
    }

    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { even, odd } => {
                let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
            Texture::Noise(noise) => noise.value(p),
            Texture::Image(image) => image.value(u, v),
        }
    }
}

/// Arena of textures addressed by [`TextureId`].
///
/// Image textures are cached by path, so loading the same file twice yields
/// the same id.
#[derive(Debug, Default)]
pub struct Textures {
    textures: Vec<Texture>,

    /// Image ids by resolved file path
    by_path: HashMap<PathBuf, TextureId>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl Textures {
    /// Create a new empty texture arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture arena with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::default()
        }
    }

    pub fn add(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        id
    }

    /// Shorthand for `add(Texture::Solid(color))`.
    pub fn solid(&mut self, color: Color) -> TextureId {
        self.add(Texture::Solid(color))
    }

    /// Load an image texture from file, using the cache if available.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> TextureResult<TextureId> {
        let full_path = self.resolve_path(path.as_ref());

        if let Some(&id) = self.by_path.get(&full_path) {
            return Ok(id);
        }

        let image = ImageTexture::load(&full_path)?;
        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            full_path.display(),
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );

        let id = self.add(Texture::Image(image));
        self.by_path.insert(full_path, id);
        Ok(id)
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.index())
    }

    /// Evaluate texture `id`. An id from another arena evaluates to black.
    pub fn value(&self, id: TextureId, u: f32, v: f32, p: Vec3) -> Color {
        self.get(id)
            .map(|texture| texture.value(u, v, p))
            .unwrap_or(Color::ZERO)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
