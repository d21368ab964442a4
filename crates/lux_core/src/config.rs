//! Render settings and scene selection.
//!
//! Settings are plain serde structs so they can be read from a JSON file and
//! then selectively overridden from the command line.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating [`Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown scene '{0}' (expected one of: {names})", names = SceneKind::names())]
    UnknownScene(String),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// The built-in scenes the renderer knows how to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    RandomSpheres,
    TwoSpheres,
    TwoPerlinSpheres,
    Earth,
    SimpleLight,
    #[default]
    CornellBox,
    CornellSmoke,
    FinalScene,
}

impl SceneKind {
    pub const ALL: [SceneKind; 8] = [
        SceneKind::RandomSpheres,
        SceneKind::TwoSpheres,
        SceneKind::TwoPerlinSpheres,
        SceneKind::Earth,
        SceneKind::SimpleLight,
        SceneKind::CornellBox,
        SceneKind::CornellSmoke,
        SceneKind::FinalScene,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::RandomSpheres => "random-spheres",
            SceneKind::TwoSpheres => "two-spheres",
            SceneKind::TwoPerlinSpheres => "two-perlin-spheres",
            SceneKind::Earth => "earth",
            SceneKind::SimpleLight => "simple-light",
            SceneKind::CornellBox => "cornell-box",
            SceneKind::CornellSmoke => "cornell-smoke",
            SceneKind::FinalScene => "final-scene",
        }
    }

    fn names() -> String {
        Self::ALL.map(SceneKind::name).join(", ")
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownScene(s.to_string()))
    }
}

/// Everything needed to produce one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: u64,
    /// Bucket (tile) edge length in pixels
    pub bucket_size: u32,
    pub scene: SceneKind,
    pub output: PathBuf,
    /// Directory image textures are resolved against
    pub texture_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0x5eed,
            bucket_size: 32,
            scene: SceneKind::default(),
            output: PathBuf::from("image.png"),
            texture_dir: PathBuf::from("assets"),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("width", self.width),
            ("height", self.height),
            ("samples_per_pixel", self.samples_per_pixel),
            ("max_depth", self.max_depth),
            ("bucket_size", self.bucket_size),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        Ok(())
    }
}
