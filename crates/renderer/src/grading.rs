//! Color grading for the assembled full-disk image.
//!
//! The grade is an ordered list of pure stages over a float image whose
//! channels live in `[0, 255]`. Values are only rounded to 8 bits when the
//! result is quantized for storage, so rounding error does not compound
//! between stages.
//!
//! Default pipeline:
//! 1. Levels, gamma 1.30
//! 2. Saturation +0.15 (in the 0-255 channel domain)
//! 3. Channel cross-mix
//! 4. Levels, gamma 1.40

use image::{Rgb, Rgb32FImage, RgbImage};
use rayon::prelude::*;

/// Maximum channel value.
const CHANNEL_MAX: f32 = 255.0;

/// Gamma of the opening levels pass.
pub const FIRST_LEVELS_GAMMA: f32 = 1.30;
/// Saturation bump, in the 0-255 channel domain.
pub const SATURATION_OFFSET: f32 = 0.15;
/// Gamma of the closing levels pass.
pub const SECOND_LEVELS_GAMMA: f32 = 1.40;

/// One pure transform of the grading pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeStage {
    /// Per-channel gamma remap: `255 * (v / 255) ^ (1 / gamma)`.
    Levels { gamma: f32 },
    /// Additive bump to HSV saturation, expressed in the 0-255 domain.
    Saturation { offset: f32 },
    /// Red/green/blue cross-mix simulating a different spectral response.
    CrossMix,
}

impl GradeStage {
    /// Apply this stage to every pixel of `img`.
    pub fn apply(&self, mut img: Rgb32FImage) -> Rgb32FImage {
        let stage = *self;
        img.par_chunks_exact_mut(3).for_each(|px| {
            let [r, g, b] = stage.apply_pixel([px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        });
        img
    }

    /// Apply this stage to one `[r, g, b]` pixel.
    pub fn apply_pixel(&self, rgb: [f32; 3]) -> [f32; 3] {
        match *self {
            GradeStage::Levels { gamma } => rgb.map(|v| levels(v, gamma)),
            GradeStage::Saturation { offset } => boost_saturation(rgb, offset),
            GradeStage::CrossMix => cross_mix(rgb),
        }
    }
}

/// Ordered grading pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGrader {
    stages: Vec<GradeStage>,
}

impl Default for ColorGrader {
    fn default() -> Self {
        Self::new(vec![
            GradeStage::Levels {
                gamma: FIRST_LEVELS_GAMMA,
            },
            GradeStage::Saturation {
                offset: SATURATION_OFFSET,
            },
            GradeStage::CrossMix,
            GradeStage::Levels {
                gamma: SECOND_LEVELS_GAMMA,
            },
        ])
    }
}

impl ColorGrader {
    pub fn new(stages: Vec<GradeStage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[GradeStage] {
        &self.stages
    }

    /// Grade an 8-bit image, returning an 8-bit image.
    pub fn grade(&self, img: &RgbImage) -> RgbImage {
        quantize(&self.grade_float(to_float(img)))
    }

    /// Run all stages on a float image without intermediate rounding.
    pub fn grade_float(&self, img: Rgb32FImage) -> Rgb32FImage {
        self.stages
            .iter()
            .fold(img, |acc, stage| stage.apply(acc))
    }

    /// Grade a single 8-bit pixel.
    pub fn grade_pixel(&self, rgb: [u8; 3]) -> [u8; 3] {
        let out = self
            .stages
            .iter()
            .fold(rgb.map(f32::from), |acc, stage| stage.apply_pixel(acc));
        out.map(to_channel)
    }
}

/// Widen an 8-bit image to float channels in `[0, 255]`.
pub fn to_float(img: &RgbImage) -> Rgb32FImage {
    let (width, height) = img.dimensions();
    Rgb32FImage::from_fn(width, height, |x, y| {
        let Rgb(c) = *img.get_pixel(x, y);
        Rgb(c.map(f32::from))
    })
}

/// Clip, round and narrow float channels back to 8 bits.
pub fn quantize(img: &Rgb32FImage) -> RgbImage {
    let (width, height) = img.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let Rgb(c) = *img.get_pixel(x, y);
        Rgb(c.map(to_channel))
    })
}

fn to_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, CHANNEL_MAX).round() as u8
}

/// Gamma levels on one channel value.
pub fn levels(v: f32, gamma: f32) -> f32 {
    let normalized = (v / CHANNEL_MAX).clamp(0.0, 1.0);
    (normalized.powf(1.0 / gamma) * CHANNEL_MAX).clamp(0.0, CHANNEL_MAX)
}

/// Add `offset` to the saturation of an RGB pixel.
///
/// Saturation is scaled to `[0, 255]` before the offset is added and clipped
/// back into range, matching the domain of the value channel.
pub fn boost_saturation(rgb: [f32; 3], offset: f32) -> [f32; 3] {
    let (h, s, v) = rgb_to_hsv(rgb);
    let s = ((s * CHANNEL_MAX + offset).clamp(0.0, CHANNEL_MAX)) / CHANNEL_MAX;
    hsv_to_rgb(h, s, v)
}

/// Cross-mix channels from the original `r, g, b`.
pub fn cross_mix([r, g, b]: [f32; 3]) -> [f32; 3] {
    let new_r = 0.2 * g + 0.8 * r;
    let new_g = 0.33 * r + 0.66 * g;
    let new_b = 0.2 * r + 0.8 * b;
    [new_r, new_g, new_b]
}

/// Convert to (hue degrees in `[0, 360)`, saturation in `[0, 1]`, value in `[0, 255]`).
pub fn rgb_to_hsv([r, g, b]: [f32; 3]) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };

    let h = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    (h.rem_euclid(360.0), s, max)
}

/// Inverse of [`rgb_to_hsv`].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let h_prime = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime.floor() as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}
