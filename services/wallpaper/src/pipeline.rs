//! End-to-end wallpaper generation.
//!
//! resolve time → fetch grid → assemble → grade → save earth image →
//! composite → save wallpaper → apply
//!
//! Every stage before apply is fatal: a failed stage stops the run before
//! anything is written over the previous wallpaper. Apply failures are
//! reported in the summary and leave the generated image in place.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{FixedOffset, Local};
use himawari_common::{ApplyError, ObservationTime, PipelineResult};
use renderer::compose::{format_label, save_jpeg};
use renderer::{assemble, ColorGrader, Compositor, LabelFont};
use tracing::{error, info, instrument};

use crate::apply::WallpaperApplier;
use crate::clock::Clock;
use crate::config::WallpaperConfig;
use crate::download::{TileFetcher, TileTransport};

/// What happened to the OS wallpaper call.
#[derive(Debug)]
pub enum ApplyOutcome {
    Applied,
    /// No applier configured (e.g. `--no-apply`)
    Skipped,
    Failed(ApplyError),
}

impl ApplyOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ApplyOutcome::Failed(_))
    }
}

/// Result of a successful generation run.
#[derive(Debug)]
pub struct RunSummary {
    pub observation_time: ObservationTime,
    pub label: String,
    pub earth_path: PathBuf,
    pub wallpaper_path: PathBuf,
    pub applied: ApplyOutcome,
}

/// The configured pipeline with its collaborators.
pub struct Pipeline {
    config: WallpaperConfig,
    fetcher: TileFetcher,
    grader: ColorGrader,
    clock: Arc<dyn Clock>,
    applier: Option<Arc<dyn WallpaperApplier>>,
    /// Label timezone; `None` uses the machine's local zone
    label_offset: Option<FixedOffset>,
}

impl Pipeline {
    pub fn new(
        config: WallpaperConfig,
        transport: Arc<dyn TileTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let fetcher = TileFetcher::new(transport, &config);
        Self {
            config,
            fetcher,
            grader: ColorGrader::default(),
            clock,
            applier: None,
            label_offset: None,
        }
    }

    pub fn with_applier(mut self, applier: Arc<dyn WallpaperApplier>) -> Self {
        self.applier = Some(applier);
        self
    }

    pub fn with_label_offset(mut self, offset: FixedOffset) -> Self {
        self.label_offset = Some(offset);
        self
    }

    pub fn config(&self) -> &WallpaperConfig {
        &self.config
    }

    /// Label text for `time` in the configured timezone.
    pub fn label_for(&self, time: &ObservationTime) -> String {
        let prefix = &self.config.label_prefix;
        match self.label_offset {
            Some(offset) => format_label(prefix, time, &offset),
            None => format_label(prefix, time, &Local),
        }
    }

    /// Run every stage once.
    #[instrument(skip(self))]
    pub async fn run(&self) -> PipelineResult<RunSummary> {
        self.config.validate()?;

        let time = ObservationTime::resolve(self.clock.now());
        info!(observation_time = %time, "Resolved observation time");

        let tiles = self.fetcher.fetch_grid(&time).await.into_tiles()?;

        let mosaic = assemble(&tiles, self.config.grid(), self.config.resolution)?;
        drop(tiles);
        info!(
            width = mosaic.width(),
            height = mosaic.height(),
            "Assembled mosaic"
        );

        let graded = self.grader.grade(&mosaic);
        info!("Color grading complete");

        let earth_path = self.config.earth_path();
        save_jpeg(&graded, &earth_path, self.config.jpeg_quality)?;

        let font = LabelFont::load(&self.config.font_path)?;
        let compositor = Compositor::new(
            self.config.canvas_width,
            self.config.canvas_height,
            font,
            self.config.label_style(),
        );
        let label = self.label_for(&time);
        let canvas = compositor.composite(&graded, &label)?;

        let wallpaper_path = self.config.wallpaper_path();
        save_jpeg(&canvas, &wallpaper_path, self.config.jpeg_quality)?;

        let applied = match &self.applier {
            None => ApplyOutcome::Skipped,
            Some(applier) => match applier.apply(&wallpaper_path) {
                Ok(()) => ApplyOutcome::Applied,
                Err(e) => {
                    error!(error = %e, path = %wallpaper_path.display(), "Failed to apply wallpaper");
                    ApplyOutcome::Failed(e)
                }
            },
        };

        Ok(RunSummary {
            observation_time: time,
            label,
            earth_path,
            wallpaper_path,
            applied,
        })
    }
}
