//! Mosaic assembly: reassemble grid tiles into one square full-disk image.

use std::collections::HashMap;

use himawari_common::{AssemblyError, TileCoord, TileGrid};
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Decoded tiles keyed by their grid position.
pub type TileSet = HashMap<TileCoord, RgbImage>;

/// Filter used when rescaling the mosaic (bilinear).
const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Assemble a complete grid of tiles and rescale it to `resolution × resolution`.
///
/// Every coordinate in `[0, grid.size)²` must be present and all tiles must
/// share the size of tile (0, 0). No placeholder tiles are substituted.
pub fn assemble(
    tiles: &TileSet,
    grid: TileGrid,
    resolution: u32,
) -> Result<RgbImage, AssemblyError> {
    if resolution == 0 {
        return Err(AssemblyError::InvalidResolution(resolution));
    }

    let mosaic = concatenate(tiles, grid)?;

    tracing::debug!(
        mosaic_width = mosaic.width(),
        mosaic_height = mosaic.height(),
        resolution = resolution,
        "Rescaling mosaic"
    );

    if mosaic.width() == resolution && mosaic.height() == resolution {
        return Ok(mosaic);
    }

    Ok(imageops::resize(&mosaic, resolution, resolution, RESIZE_FILTER))
}

/// Concatenate tiles without rescaling.
///
/// Row `r` of the output is tiles `(0, r)..(size-1, r)` left to right; rows
/// are stacked top to bottom in increasing row order.
pub fn concatenate(tiles: &TileSet, grid: TileGrid) -> Result<RgbImage, AssemblyError> {
    if grid.size == 0 {
        return Err(AssemblyError::EmptyGrid);
    }

    if let Some(missing) = grid.coords().find(|c| !tiles.contains_key(c)) {
        return Err(AssemblyError::MissingTile(missing));
    }

    let origin = TileCoord::new(0, 0);
    let (tile_width, tile_height) = tiles
        .get(&origin)
        .map(|t| t.dimensions())
        .ok_or(AssemblyError::MissingTile(origin))?;

    let mut mosaic = RgbImage::new(tile_width * grid.size, tile_height * grid.size);

    for coord in grid.coords() {
        let tile = tiles
            .get(&coord)
            .ok_or(AssemblyError::MissingTile(coord))?;

        if tile.dimensions() != (tile_width, tile_height) {
            return Err(AssemblyError::TileSizeMismatch {
                coord,
                expected_width: tile_width,
                expected_height: tile_height,
                actual_width: tile.width(),
                actual_height: tile.height(),
            });
        }

        let x = (coord.col * tile_width) as i64;
        let y = (coord.row * tile_height) as i64;
        imageops::replace(&mut mosaic, tile, x, y);
    }

    Ok(mosaic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(w: u32, h: u32, c: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(c))
    }

    #[test]
    fn test_single_tile_passthrough() {
        let mut tiles = TileSet::new();
        tiles.insert(TileCoord::new(0, 0), solid(8, 8, [10, 20, 30]));
        let out = assemble(&tiles, TileGrid::new(1), 8).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(out.get_pixel(4, 4), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let mut tiles = TileSet::new();
        tiles.insert(TileCoord::new(0, 0), solid(8, 8, [0, 0, 0]));
        assert_eq!(
            assemble(&tiles, TileGrid::new(1), 0),
            Err(AssemblyError::InvalidResolution(0))
        );
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert_eq!(
            concatenate(&TileSet::new(), TileGrid::new(0)),
            Err(AssemblyError::EmptyGrid)
        );
    }

    #[test]
    fn test_mismatched_tile_size_rejected() {
        let mut tiles = TileSet::new();
        tiles.insert(TileCoord::new(0, 0), solid(4, 4, [0, 0, 0]));
        tiles.insert(TileCoord::new(1, 0), solid(4, 4, [0, 0, 0]));
        tiles.insert(TileCoord::new(0, 1), solid(4, 5, [0, 0, 0]));
        tiles.insert(TileCoord::new(1, 1), solid(4, 4, [0, 0, 0]));
        let err = concatenate(&tiles, TileGrid::new(2)).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::TileSizeMismatch { coord, actual_height: 5, .. } if coord == TileCoord::new(0, 1)
        ));
    }
}
