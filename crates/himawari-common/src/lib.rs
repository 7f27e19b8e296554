//! Common types shared across the Himawari wallpaper crates.

pub mod error;
pub mod tile;
pub mod time;

pub use error::{
    ApplyError, AssemblyError, CompositionError, FetchError, PipelineError, PipelineResult,
};
pub use tile::{TileCoord, TileGrid};
pub use time::ObservationTime;
