//! Error types for the wallpaper pipeline, one per stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::tile::TileCoord;

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// A single tile could not be retrieved within its attempt budget.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Tile {coord} failed after {attempts} attempts ({url}): {last_error}")]
    RetriesExhausted {
        coord: TileCoord,
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Tile {coord} is outside the {grid_size}x{grid_size} grid")]
    OutOfGrid { coord: TileCoord, grid_size: u32 },
}

impl FetchError {
    pub fn coord(&self) -> TileCoord {
        match self {
            FetchError::RetriesExhausted { coord, .. } | FetchError::OutOfGrid { coord, .. } => {
                *coord
            }
        }
    }
}

/// The tile set could not be turned into a mosaic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("Missing tile {0}")]
    MissingTile(TileCoord),

    #[error("Tile {coord} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    TileSizeMismatch {
        coord: TileCoord,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Grid size must be at least 1")]
    EmptyGrid,

    #[error("Invalid target resolution: {0}")]
    InvalidResolution(u32),
}

/// The final canvas could not be produced or written.
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("Failed to read font {path}: {message}")]
    FontRead { path: PathBuf, message: String },

    #[error("Not a usable TrueType font: {0}")]
    InvalidFont(PathBuf),

    #[error("Image {width}x{height} does not fit on {canvas_width}x{canvas_height} canvas")]
    ImageTooLarge {
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Setting the desktop background failed.
///
/// Reported to the user but does not invalidate the generated image.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Wallpaper image not found: {0}")]
    MissingImage(PathBuf),

    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Setting the wallpaper is not supported on {0}")]
    Unsupported(&'static str),
}

/// Fatal failure of one pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Fetch stage failed for {failed} tile(s), first: {first}")]
    Fetch { failed: usize, first: FetchError },

    #[error("Assembly stage failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Composition stage failed: {0}")]
    Composition(#[from] CompositionError),

    #[error("I/O error: {0}")]
    Io(String),
}

impl PipelineError {
    /// Name of the stage that failed, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "config",
            PipelineError::Fetch { .. } => "fetch",
            PipelineError::Assembly(_) => "assembly",
            PipelineError::Composition(_) => "composition",
            PipelineError::Io(_) => "io",
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Fetch { .. } => 2,
            PipelineError::Assembly(_) => 3,
            PipelineError::Composition(_) => 4,
            PipelineError::Config(_) => 5,
            PipelineError::Io(_) => 6,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_tile() {
        let err = FetchError::RetriesExhausted {
            coord: TileCoord::new(2, 3),
            url: "http://example.com/t.png".to_string(),
            attempts: 10,
            last_error: "HTTP error: 404 Not Found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("(2, 3)"));
        assert!(msg.contains("10 attempts"));
        assert!(msg.contains("404"));
        assert_eq!(err.coord(), TileCoord::new(2, 3));
    }

    #[test]
    fn test_stage_and_exit_codes_are_distinct() {
        let errors = [
            PipelineError::Config("x".into()),
            PipelineError::Fetch {
                failed: 1,
                first: FetchError::OutOfGrid {
                    coord: TileCoord::new(9, 9),
                    grid_size: 4,
                },
            },
            PipelineError::Assembly(AssemblyError::EmptyGrid),
            PipelineError::Composition(CompositionError::InvalidFont("f.ttf".into())),
            PipelineError::Io("disk full".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|&c| c != 0));
        assert_eq!(errors[1].stage(), "fetch");
    }

    #[test]
    fn test_assembly_error_converts() {
        let err: PipelineError = AssemblyError::MissingTile(TileCoord::new(0, 1)).into();
        assert_eq!(err.stage(), "assembly");
        assert!(err.to_string().contains("(0, 1)"));
    }
}
