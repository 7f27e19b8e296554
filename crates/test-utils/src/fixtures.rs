//! Common test fixtures for wallpaper pipeline tests.
//!
//! This module provides pre-defined data representing common scenarios:
//! distinct tile colors for ordering checks and fixed clock readings.

use chrono::{DateTime, TimeZone, Utc};

/// Sixteen clearly distinct colors, one per tile of a 4×4 grid in row-major order.
///
/// Channels stay away from 0 and 255 so graded and rescaled values remain
/// distinguishable.
pub const TILE_PALETTE: [[u8; 3]; 16] = [
    [200, 30, 30],
    [30, 200, 30],
    [30, 30, 200],
    [200, 200, 30],
    [200, 30, 200],
    [30, 200, 200],
    [120, 60, 20],
    [20, 120, 60],
    [60, 20, 120],
    [180, 120, 60],
    [60, 180, 120],
    [120, 60, 180],
    [90, 90, 90],
    [160, 160, 160],
    [220, 100, 140],
    [40, 140, 220],
];

/// Color of tile `(col, row)` in a grid of `grid_size` columns.
///
/// # Panics
///
/// Panics when the grid has more tiles than the palette.
pub fn tile_color(col: u32, row: u32, grid_size: u32) -> [u8; 3] {
    TILE_PALETTE[(row * grid_size + col) as usize]
}

/// Bytes that are not a decodable image.
pub const CORRUPT_PNG: &[u8] = b"\x89PNG\r\n\x1a\nthis is not really a png";

/// A fixed clock reading that is not aligned to a 10-minute boundary.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 3, 27, 41).unwrap()
}

/// Tile path expected for `fixed_now()` once resolved: one day back, 03:20:00.
pub const FIXED_NOW_TILE_PATH: &str = "2024/07/14/032000";
