//! Tests for mosaic assembly.
//!
//! Tests the tile ordering contract (column is horizontal, row is vertical),
//! completeness checks and rescaling.

use himawari_common::{AssemblyError, TileCoord, TileGrid};
use renderer::mosaic::{assemble, concatenate, TileSet};
use test_utils::{assert_color_near, solid_tile, tile_color};

// ============================================================================
// Helper functions
// ============================================================================

/// Build a full grid of solid tiles colored from the shared palette.
fn palette_tiles(grid: TileGrid, tile_side: u32) -> TileSet {
    grid.coords()
        .map(|c| {
            (
                c,
                solid_tile(tile_side, tile_side, tile_color(c.col, c.row, grid.size)),
            )
        })
        .collect()
}

// ============================================================================
// Ordering tests
// ============================================================================

#[test]
fn test_concatenate_places_tiles_by_column_and_row() {
    let grid = TileGrid::new(4);
    let tiles = palette_tiles(grid, 10);

    let mosaic = concatenate(&tiles, grid).unwrap();
    assert_eq!(mosaic.dimensions(), (40, 40));

    for coord in grid.coords() {
        let expected = tile_color(coord.col, coord.row, 4);
        // Every pixel of the cell, not just a corner
        for dy in 0..10 {
            for dx in 0..10 {
                let px = mosaic.get_pixel(coord.col * 10 + dx, coord.row * 10 + dy);
                assert_eq!(px.0, expected, "tile {coord} pixel ({dx}, {dy})");
            }
        }
    }
}

#[test]
fn test_concatenate_is_not_transposed() {
    let grid = TileGrid::new(2);
    let mut tiles = TileSet::new();
    tiles.insert(TileCoord::new(0, 0), solid_tile(5, 5, [0, 0, 0]));
    tiles.insert(TileCoord::new(1, 0), solid_tile(5, 5, [255, 0, 0]));
    tiles.insert(TileCoord::new(0, 1), solid_tile(5, 5, [0, 255, 0]));
    tiles.insert(TileCoord::new(1, 1), solid_tile(5, 5, [0, 0, 255]));

    let mosaic = concatenate(&tiles, grid).unwrap();

    // (col 1, row 0) is top-right
    assert_eq!(mosaic.get_pixel(7, 2).0, [255, 0, 0]);
    // (col 0, row 1) is bottom-left
    assert_eq!(mosaic.get_pixel(2, 7).0, [0, 255, 0]);
    assert_eq!(mosaic.get_pixel(7, 7).0, [0, 0, 255]);
}

#[test]
fn test_concatenate_rectangular_tiles() {
    let grid = TileGrid::new(2);
    let tiles: TileSet = grid
        .coords()
        .map(|c| (c, solid_tile(6, 3, tile_color(c.col, c.row, 2))))
        .collect();

    let mosaic = concatenate(&tiles, grid).unwrap();
    assert_eq!(mosaic.dimensions(), (12, 6));
    assert_eq!(mosaic.get_pixel(11, 5).0, tile_color(1, 1, 2));
}

// ============================================================================
// Rescaling tests
// ============================================================================

#[test]
fn test_assemble_rescales_to_target_resolution() {
    let grid = TileGrid::new(4);
    let tiles = palette_tiles(grid, 10);

    let out = assemble(&tiles, grid, 400).unwrap();
    assert_eq!(out.dimensions(), (400, 400));

    // Cell centers are far from the seams, so interpolation keeps the colors.
    for coord in grid.coords() {
        let px = out.get_pixel(coord.col * 100 + 50, coord.row * 100 + 50);
        assert_color_near!(px.0, tile_color(coord.col, coord.row, 4), 1);
    }
}

#[test]
fn test_assemble_downscales() {
    let grid = TileGrid::new(2);
    let tiles = palette_tiles(grid, 100);

    let out = assemble(&tiles, grid, 50).unwrap();
    assert_eq!(out.dimensions(), (50, 50));
    assert_color_near!(out.get_pixel(12, 12).0, tile_color(0, 0, 2), 1);
    assert_color_near!(out.get_pixel(37, 37).0, tile_color(1, 1, 2), 1);
}

// ============================================================================
// Completeness tests
// ============================================================================

#[test]
fn test_missing_any_single_tile_fails() {
    let grid = TileGrid::new(4);
    let full = palette_tiles(grid, 4);

    for missing in grid.coords() {
        let mut tiles = full.clone();
        tiles.remove(&missing);
        assert_eq!(
            assemble(&tiles, grid, 16),
            Err(AssemblyError::MissingTile(missing)),
            "removing {missing}"
        );
    }
}

#[test]
fn test_empty_tile_set_reports_first_tile() {
    assert_eq!(
        assemble(&TileSet::new(), TileGrid::new(4), 100),
        Err(AssemblyError::MissingTile(TileCoord::new(0, 0)))
    );
}

#[test]
fn test_extra_tiles_outside_grid_are_ignored() {
    let grid = TileGrid::new(2);
    let mut tiles = palette_tiles(grid, 4);
    tiles.insert(TileCoord::new(5, 5), solid_tile(4, 4, [1, 1, 1]));

    let mosaic = concatenate(&tiles, grid).unwrap();
    assert_eq!(mosaic.dimensions(), (8, 8));
}
