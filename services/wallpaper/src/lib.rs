//! Himawari wallpaper generator.
//!
//! Downloads yesterday's full-disk tiles for the nearest 10-minute slot,
//! stitches and color-grades them, then composes a labeled desktop
//! wallpaper and hands it to the operating system.

pub mod apply;
pub mod clock;
pub mod config;
pub mod download;
pub mod pipeline;

pub use apply::{SystemWallpaper, WallpaperApplier};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::WallpaperConfig;
pub use download::{FetchReport, HttpTransport, TileFetcher, TileTransport};
pub use pipeline::{ApplyOutcome, Pipeline, RunSummary};
