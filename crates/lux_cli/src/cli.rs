use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lux_core::{ConfigError, SceneKind, Settings};

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments. Every render flag overrides the settings file.
#[derive(Debug, Parser)]
#[command(name = "lux")]
#[command(about = "A Monte Carlo path tracer with light importance sampling")]
pub struct Args {
    /// JSON settings file; missing fields take their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scene to render
    #[arg(long)]
    pub scene: Option<SceneKind>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples_per_pixel: Option<u32>,

    /// Maximum bounce depth
    #[arg(long, short = 'd')]
    pub max_depth: Option<u32>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bucket edge length in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Output PNG path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory image textures are loaded from
    #[arg(long)]
    pub texture_dir: Option<PathBuf>,

    /// Print the available scene names and exit
    #[arg(long)]
    pub list_scenes: bool,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Settings from the config file (or defaults) with flags applied on top.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        self.apply(&mut settings);
        Ok(settings)
    }

    fn apply(&self, settings: &mut Settings) {
        if let Some(scene) = self.scene {
            settings.scene = scene;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(spp) = self.samples_per_pixel {
            settings.samples_per_pixel = spp;
        }
        if let Some(depth) = self.max_depth {
            settings.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(size) = self.bucket_size {
            settings.bucket_size = size;
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(dir) = &self.texture_dir {
            settings.texture_dir = dir.clone();
        }
    }
}
