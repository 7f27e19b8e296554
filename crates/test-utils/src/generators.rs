//! Synthetic image generators for tile and grading tests.
//!
//! These generators create predictable, verifiable images so tests can check
//! tile placement and color transforms pixel by pixel.

use std::io::Cursor;

use image::{ImageOutputFormat, Rgb, RgbImage};

/// Creates a tile filled with a single color.
///
/// # Example
///
/// ```
/// use test_utils::solid_tile;
///
/// let tile = solid_tile(10, 10, [255, 0, 0]);
/// assert_eq!(tile.get_pixel(9, 9).0, [255, 0, 0]);
/// ```
pub fn solid_tile(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Encodes an image as PNG bytes, as a tile server would return it.
pub fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    buf.into_inner()
}

/// PNG bytes of a solid-color tile.
pub fn solid_tile_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode_png(&solid_tile(width, height, color))
}

/// Creates an image whose every pixel is different.
///
/// Channel values follow a fixed linear congruential sequence seeded by
/// `seed`, so the same seed always gives the same image and all 8-bit values
/// are exercised on images of a few hundred pixels.
pub fn noise_image(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 24) as u8
    };
    RgbImage::from_fn(width, height, |_, _| Rgb([next(), next(), next()]))
}

/// Creates a horizontal gray ramp from black on the left to white on the right.
pub fn gray_ramp(width: u32, height: u32) -> RgbImage {
    let span = width.saturating_sub(1).max(1) as f32;
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x as f32 / span * 255.0).round() as u8;
        Rgb([v, v, v])
    })
}
