//! Wallpaper composition: paste the graded disk onto a fixed-size canvas and
//! draw the timestamp label underneath.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::TimeZone;
use himawari_common::{CompositionError, ObservationTime};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ColorType, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};

pub const DEFAULT_CANVAS_WIDTH: u32 = 3840;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 2160;

/// A TrueType font loaded from disk for the label.
pub struct LabelFont {
    font: Font<'static>,
    path: PathBuf,
}

impl LabelFont {
    /// Load a font file. A missing or unparseable font is a hard error;
    /// there is no fallback font.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CompositionError> {
        let path = path.as_ref().to_path_buf();
        let data = std::fs::read(&path).map_err(|e| CompositionError::FontRead {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::from_bytes(data, path)
    }

    pub fn from_bytes(data: Vec<u8>, path: PathBuf) -> Result<Self, CompositionError> {
        let font = Font::try_from_vec(data).ok_or_else(|| CompositionError::InvalidFont(path.clone()))?;
        Ok(Self { font, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Horizontal advance of `text` at `size` pixels.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let scale = Scale::uniform(size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").field("path", &self.path).finish()
    }
}

/// Label appearance and placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Font size in pixels
    pub size: f32,
    /// Low-contrast gray; the canvas has no alpha so this is drawn opaque
    pub color: Rgb<u8>,
    /// Top of the label, measured up from the bottom edge of the canvas
    pub offset_from_bottom: u32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size: 25.0,
            color: Rgb([100, 100, 100]),
            offset_from_bottom: 200,
        }
    }
}

/// Composes the final wallpaper canvas.
#[derive(Debug)]
pub struct Compositor {
    canvas_width: u32,
    canvas_height: u32,
    font: LabelFont,
    style: LabelStyle,
}

impl Compositor {
    pub fn new(canvas_width: u32, canvas_height: u32, font: LabelFont, style: LabelStyle) -> Self {
        Self {
            canvas_width,
            canvas_height,
            font,
            style,
        }
    }

    /// 3840×2160 canvas with the default label style.
    pub fn with_font(font: LabelFont) -> Self {
        Self::new(
            DEFAULT_CANVAS_WIDTH,
            DEFAULT_CANVAS_HEIGHT,
            font,
            LabelStyle::default(),
        )
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Paste `graded` centered on a black canvas and draw `label` below it.
    pub fn composite(&self, graded: &RgbImage, label: &str) -> Result<RgbImage, CompositionError> {
        let (x, y) = centered_offset(
            (self.canvas_width, self.canvas_height),
            graded.dimensions(),
        )
        .ok_or(CompositionError::ImageTooLarge {
            width: graded.width(),
            height: graded.height(),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
        })?;

        let mut canvas = RgbImage::new(self.canvas_width, self.canvas_height);
        imageops::replace(&mut canvas, graded, x as i64, y as i64);

        let (label_x, label_y) = self.label_position(label);
        tracing::debug!(label = %label, x = label_x, y = label_y, "Drawing label");
        draw_text_mut(
            &mut canvas,
            self.style.color,
            label_x,
            label_y,
            Scale::uniform(self.style.size),
            &self.font.font,
            label,
        );

        Ok(canvas)
    }

    /// Top-left of the label: horizontally centered, fixed distance from the bottom.
    pub fn label_position(&self, label: &str) -> (i32, i32) {
        let text_width = self.font.text_width(label, self.style.size);
        let x = ((self.canvas_width as f32 - text_width) / 2.0).floor() as i32;
        let y = self.canvas_height as i32 - self.style.offset_from_bottom as i32;
        (x, y)
    }
}

/// Offset that centers an image on a canvas, using floor division.
///
/// Returns `None` when the image is larger than the canvas.
pub fn centered_offset(canvas: (u32, u32), image: (u32, u32)) -> Option<(u32, u32)> {
    let x = canvas.0.checked_sub(image.0)? / 2;
    let y = canvas.1.checked_sub(image.1)? / 2;
    Some((x, y))
}

/// Label text: `{prefix}YYYY-MM-DD HH:MM:SS` in the given timezone.
pub fn format_label<Tz>(prefix: &str, time: &ObservationTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}", prefix, time.format_in(tz))
}

/// Write an RGB image as JPEG.
///
/// The data is written to a temporary file next to `path` and renamed into
/// place, so a failed write never leaves a truncated image at `path`.
pub fn save_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<(), CompositionError> {
    let write_err = |message: String| CompositionError::Write {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        JpegEncoder::new_with_quality(&mut writer, quality)
            .encode(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
            .map_err(|e| write_err(e.to_string()))?;
        writer.flush().map_err(|e| write_err(e.to_string()))?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;

    tracing::info!(path = %path.display(), "Image saved");
    Ok(())
}
