//! Configuration for the wallpaper pipeline.
//!
//! Every field has a default, so the program runs without any configuration.
//! An optional YAML file can override any subset of fields:
//!
//! ```yaml
//! grid_size: 4
//! resolution: 1500
//! font_path: /usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf
//! output_dir: /home/me/Pictures/himawari
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use himawari_common::{PipelineError, TileGrid};
use image::Rgb;
use renderer::LabelStyle;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Root configuration, loaded from YAML or built from defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallpaperConfig {
    /// Tile server root, without the resolution segment
    pub base_url: String,
    /// Tiles per side of the full-disk grid
    pub grid_size: u32,
    /// Pixel side of one tile, part of the server path
    pub tile_size: u32,
    /// Side of the rescaled full-disk image
    pub resolution: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Attempts per tile before giving up (no delay between attempts)
    pub max_attempts: u32,
    /// Tile fetches in flight at once
    pub max_concurrent: usize,
    /// Per-attempt HTTP timeout; unset waits indefinitely
    pub request_timeout_secs: Option<u64>,
    pub font_path: PathBuf,
    pub font_size: f32,
    pub label_prefix: String,
    pub label_offset_from_bottom: u32,
    pub output_dir: PathBuf,
    pub earth_filename: String,
    pub wallpaper_filename: String,
    pub jpeg_quality: u8,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://himawari8.nict.go.jp/img/D531106".to_string(),
            grid_size: 4,
            tile_size: 550,
            resolution: 1500,
            canvas_width: 3840,
            canvas_height: 2160,
            max_attempts: 10,
            max_concurrent: 4,
            request_timeout_secs: None,
            font_path: default_font_path(),
            font_size: 25.0,
            label_prefix: "Last Update: ".to_string(),
            label_offset_from_bottom: 200,
            output_dir: std::env::temp_dir().join("himawari-wallpaper"),
            earth_filename: "latest-earth.jpg".to_string(),
            wallpaper_filename: "wallpaper.jpg".to_string(),
            jpeg_quality: 90,
        }
    }
}

fn default_font_path() -> PathBuf {
    match std::env::consts::OS {
        "windows" => PathBuf::from(r"C:\Windows\Fonts\times.ttf"),
        "macos" => PathBuf::from("/System/Library/Fonts/Supplemental/Times New Roman.ttf"),
        _ => PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf"),
    }
}

impl WallpaperConfig {
    /// Load a YAML file; fields missing from the file keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |msg: String| Err(PipelineError::Config(msg));

        if self.grid_size == 0 {
            return invalid("grid_size must be at least 1".into());
        }
        if self.resolution == 0 {
            return invalid("resolution must be at least 1".into());
        }
        if self.resolution > self.canvas_width || self.resolution > self.canvas_height {
            return invalid(format!(
                "resolution {} does not fit on {}x{} canvas",
                self.resolution, self.canvas_width, self.canvas_height
            ));
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1".into());
        }
        if self.max_concurrent == 0 {
            return invalid("max_concurrent must be at least 1".into());
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return invalid(format!("jpeg_quality {} not in 1..=100", self.jpeg_quality));
        }
        if self.earth_filename == self.wallpaper_filename {
            return invalid("earth_filename and wallpaper_filename must differ".into());
        }
        Ok(())
    }

    pub fn grid(&self) -> TileGrid {
        TileGrid::new(self.grid_size)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn earth_path(&self) -> PathBuf {
        self.output_dir.join(&self.earth_filename)
    }

    pub fn wallpaper_path(&self) -> PathBuf {
        self.output_dir.join(&self.wallpaper_filename)
    }

    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            size: self.font_size,
            color: Rgb([100, 100, 100]),
            offset_from_bottom: self.label_offset_from_bottom,
        }
    }
}
