//! Tile grid addressing for the full-disk mosaic.
//!
//! The full disk is published as an N×N grid of square tiles. Column is the
//! horizontal axis and row the vertical axis, both counted from the top-left.

use serde::{Deserialize, Serialize};

/// Position of one tile in the source grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column (x)
    pub col: u32,
    /// Row (y)
    pub row: u32,
}

impl TileCoord {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// File name suffix used by the tile server: `{col}_{row}`.
    pub fn path_suffix(&self) -> String {
        format!("{}_{}", self.col, self.row)
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A square grid of `size × size` tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub size: u32,
}

impl TileGrid {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.col < self.size && coord.row < self.size
    }

    /// All coordinates in row-major order (row 0 left to right, then row 1...).
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| TileCoord::new(col, row)))
    }

    /// Resolution code for the server path, e.g. `4d` for a 4×4 grid.
    pub fn level_code(&self) -> String {
        format!("{}d", self.size)
    }
}
