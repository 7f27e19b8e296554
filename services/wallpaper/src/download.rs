//! Tile retrieval with bounded, immediate retry.
//!
//! Key features:
//! - Deterministic tile URLs from grid position and observation time
//! - Injectable transport (HTTP in production, in-memory in tests)
//! - Decoding failures count against the same attempt budget as network errors
//! - Bounded parallel fetch of the whole grid

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use himawari_common::{FetchError, ObservationTime, PipelineError, TileCoord, TileGrid};
use image::RgbImage;
use renderer::TileSet;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::WallpaperConfig;

/// Source of raw tile bytes.
#[async_trait]
pub trait TileTransport: Send + Sync {
    /// GET `url`, failing on transport errors and non-success status.
    async fn get(&self, url: &str) -> Result<Bytes>;
}

/// HTTP transport backed by reqwest.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport. With `timeout` unset each attempt blocks until
    /// the server answers or the connection fails.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("himawari-wallpaper/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TileTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP error: {}", status));
        }

        response.bytes().await.context("Error reading response body")
    }
}

/// Outcome of fetching every tile of the grid.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub tiles: TileSet,
    pub failures: Vec<FetchError>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The tile set, or a fetch-stage error naming the first failed tile in
    /// row-major order.
    pub fn into_tiles(mut self) -> Result<TileSet, PipelineError> {
        if self.failures.is_empty() {
            return Ok(self.tiles);
        }
        self.failures
            .sort_by_key(|e| (e.coord().row, e.coord().col));
        let failed = self.failures.len();
        let first = self.failures.swap_remove(0);
        Err(PipelineError::Fetch { failed, first })
    }
}

/// Fetches and decodes tiles for one observation time.
pub struct TileFetcher {
    transport: Arc<dyn TileTransport>,
    base_url: String,
    grid: TileGrid,
    tile_size: u32,
    max_attempts: u32,
    max_concurrent: usize,
}

impl TileFetcher {
    pub fn new(transport: Arc<dyn TileTransport>, config: &WallpaperConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            grid: config.grid(),
            tile_size: config.tile_size,
            max_attempts: config.max_attempts,
            max_concurrent: config.max_concurrent,
        }
    }

    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    /// `{base}/{N}d/{tile_size}/{YYYY}/{MM}/{DD}/{HHMMSS}_{col}_{row}.png`
    pub fn tile_url(&self, coord: TileCoord, time: &ObservationTime) -> String {
        format!(
            "{}/{}/{}/{}/{}_{}.png",
            self.base_url,
            self.grid.level_code(),
            self.tile_size,
            time.date_path(),
            time.time_stamp(),
            coord.path_suffix()
        )
    }

    /// Fetch one tile, retrying immediately up to the attempt budget.
    #[instrument(skip_all, fields(coord = %coord))]
    pub async fn fetch(
        &self,
        coord: TileCoord,
        time: &ObservationTime,
    ) -> Result<RgbImage, FetchError> {
        if !self.grid.contains(coord) {
            return Err(FetchError::OutOfGrid {
                coord,
                grid_size: self.grid.size,
            });
        }

        let url = self.tile_url(coord, time);
        debug!(url = %url, "Fetching tile");

        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            match self.attempt(&url).await {
                Ok(tile) => {
                    debug!(
                        url = %url,
                        attempt = attempt,
                        width = tile.width(),
                        height = tile.height(),
                        "Tile fetched"
                    );
                    return Ok(tile);
                }
                Err(e) => {
                    last_error = format!("{:#}", e);
                    warn!(
                        url = %url,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        error = %last_error,
                        "Tile attempt failed"
                    );
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            coord,
            url,
            attempts: self.max_attempts,
            last_error,
        })
    }

    async fn attempt(&self, url: &str) -> Result<RgbImage> {
        let bytes = self.transport.get(url).await?;
        let tile = image::load_from_memory(&bytes).context("Failed to decode tile image")?;
        Ok(tile.to_rgb8())
    }

    /// Fetch every tile of the grid with bounded concurrency.
    ///
    /// A failed tile does not stop its siblings; all failures are collected
    /// in the report once every fetch has finished.
    pub async fn fetch_grid(&self, time: &ObservationTime) -> FetchReport {
        info!(
            time = %time,
            tiles = self.grid.tile_count(),
            max_concurrent = self.max_concurrent,
            "Fetching tile grid"
        );

        let results: Vec<(TileCoord, Result<RgbImage, FetchError>)> =
            stream::iter(self.grid.coords())
                .map(|coord| async move { (coord, self.fetch(coord, time).await) })
                .buffer_unordered(self.max_concurrent.max(1))
                .collect()
                .await;

        let mut report = FetchReport::default();
        for (coord, result) in results {
            match result {
                Ok(tile) => {
                    report.tiles.insert(coord, tile);
                }
                Err(e) => report.failures.push(e),
            }
        }

        info!(
            fetched = report.tiles.len(),
            failed = report.failures.len(),
            "Tile grid fetch complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct NeverCalled;

    #[async_trait]
    impl TileTransport for NeverCalled {
        async fn get(&self, _url: &str) -> Result<Bytes> {
            panic!("transport should not be called");
        }
    }

    fn fetcher() -> TileFetcher {
        TileFetcher::new(Arc::new(NeverCalled), &WallpaperConfig::default())
    }

    #[test]
    fn test_tile_url_layout() {
        let time = ObservationTime::resolve(Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap());
        assert_eq!(
            fetcher().tile_url(TileCoord::new(2, 1), &time),
            "https://himawari8.nict.go.jp/img/D531106/4d/550/2024/03/04/070000_2_1.png"
        );
    }

    #[test]
    fn test_tile_url_trims_trailing_slash() {
        let config = WallpaperConfig {
            base_url: "http://tiles.local/img/".to_string(),
            grid_size: 8,
            ..Default::default()
        };
        let fetcher = TileFetcher::new(Arc::new(NeverCalled), &config);
        let time = ObservationTime::resolve(Utc.with_ymd_and_hms(2024, 12, 25, 23, 59, 59).unwrap());
        assert_eq!(
            fetcher.tile_url(TileCoord::new(7, 0), &time),
            "http://tiles.local/img/8d/550/2024/12/24/235000_7_0.png"
        );
    }

    #[tokio::test]
    async fn test_out_of_grid_fails_without_request() {
        let time = ObservationTime::resolve(Utc::now());
        let err = fetcher().fetch(TileCoord::new(4, 0), &time).await.unwrap_err();
        assert!(matches!(err, FetchError::OutOfGrid { grid_size: 4, .. }));
    }

    #[test]
    fn test_report_names_first_failure_row_major() {
        let failure = |col, row| FetchError::RetriesExhausted {
            coord: TileCoord::new(col, row),
            url: String::new(),
            attempts: 10,
            last_error: "boom".into(),
        };
        let report = FetchReport {
            tiles: TileSet::new(),
            failures: vec![failure(0, 2), failure(3, 1), failure(1, 1)],
        };
        match report.into_tiles() {
            Err(PipelineError::Fetch { failed, first }) => {
                assert_eq!(failed, 3);
                assert_eq!(first.coord(), TileCoord::new(1, 1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
