//! Image processing for the full-disk wallpaper.
//!
//! Implements the pure image stages:
//! - Mosaic assembly from grid tiles
//! - Color grading (levels, saturation, channel cross-mix)
//! - Composition onto the wallpaper canvas with a timestamp label

pub mod compose;
pub mod grading;
pub mod mosaic;

pub use compose::{Compositor, LabelFont, LabelStyle};
pub use grading::{ColorGrader, GradeStage};
pub use mosaic::{assemble, concatenate, TileSet};
