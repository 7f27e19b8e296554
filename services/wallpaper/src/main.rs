//! Himawari wallpaper command-line entry point.
//!
//! Runs the pipeline once and exits. The exit code names the stage that
//! failed so schedulers (cron, Task Scheduler, launchd) can tell a network
//! outage from a broken configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use himawari_common::PipelineError;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use himawari_wallpaper::{
    ApplyOutcome, HttpTransport, Pipeline, SystemClock, SystemWallpaper, WallpaperConfig,
};

/// Exit code when the image was generated but could not be set as wallpaper.
const EXIT_APPLY_FAILED: i32 = 7;

#[derive(Parser, Debug)]
#[command(name = "himawari-wallpaper")]
#[command(about = "Set the desktop background to the latest Himawari full-disk image")]
struct Args {
    /// YAML configuration file (all fields optional)
    #[arg(long, env = "HIMAWARI_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for latest-earth.jpg and wallpaper.jpg
    #[arg(long, env = "HIMAWARI_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// TrueType font for the timestamp label
    #[arg(long, env = "HIMAWARI_FONT")]
    font_path: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Generate the images but leave the desktop background alone
    #[arg(long)]
    no_apply: bool,
}

fn load_config(args: &Args) -> Result<WallpaperConfig> {
    let mut config = match &args.config {
        Some(path) => WallpaperConfig::from_yaml_file(path)?,
        None => WallpaperConfig::default(),
    };
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(font) = &args.font_path {
        config.font_path = font.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Himawari wallpaper update");

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => exit_with(PipelineError::Config(format!("{:#}", e))),
    };

    let transport = match HttpTransport::new(config.request_timeout()) {
        Ok(transport) => transport,
        Err(e) => exit_with(PipelineError::Io(format!("{:#}", e))),
    };

    let mut pipeline = Pipeline::new(config, Arc::new(transport), Arc::new(SystemClock));
    if !args.no_apply {
        pipeline = pipeline.with_applier(Arc::new(SystemWallpaper));
    }

    let summary = match pipeline.run().await {
        Ok(summary) => summary,
        Err(e) => exit_with(e),
    };

    info!(
        observation_time = %summary.observation_time,
        earth = %summary.earth_path.display(),
        wallpaper = %summary.wallpaper_path.display(),
        "Wallpaper generated"
    );

    match summary.applied {
        ApplyOutcome::Applied => info!("Desktop background updated"),
        ApplyOutcome::Skipped => info!("Skipping desktop update (--no-apply)"),
        ApplyOutcome::Failed(e) => {
            warn!(error = %e, "Image generated but not applied");
            std::process::exit(EXIT_APPLY_FAILED);
        }
    }

    Ok(())
}

fn exit_with(err: PipelineError) -> ! {
    error!(stage = err.stage(), error = %err, "Wallpaper update failed");
    std::process::exit(err.exit_code())
}
