//! Tilecheck CLI - command-line interface
//!
//! Runs the tile checker pipeline against the remote catalog and writes
//! the composite checkerboard texture to a PNG file, which stands in for
//! the render host's surface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use tilecheck::{
    config, PipelineConfig, PngFileSurface, ReqwestClient, TileCheckerPipeline,
};

/// Download remote image tiles and composite them into a checkerboard texture.
#[derive(Debug, Parser)]
#[command(name = "tilecheck", version, about)]
struct Cli {
    /// Tile catalog endpoint URL.
    #[arg(long, default_value = config::DEFAULT_API_URL)]
    api_url: String,

    /// Directory downloaded tiles are stored in.
    ///
    /// Defaults to `Tiles/` under the platform data directory.
    #[arg(long)]
    tile_dir: Option<PathBuf>,

    /// Output path for the composite texture.
    #[arg(long, default_value = "checker.png")]
    output: PathBuf,

    /// Cells per side in the checker pattern.
    #[arg(long, default_value_t = tilecheck::DEFAULT_PATTERN_SIZE)]
    pattern_size: u32,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = tilecheck::http::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tilecheck::telemetry::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "pipeline failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PipelineConfig::default()
        .with_api_url(cli.api_url)
        .with_pattern_size(cli.pattern_size)
        .with_http_timeout_secs(cli.timeout_secs);
    if let Some(tile_dir) = cli.tile_dir {
        config = config.with_tile_dir(tile_dir);
    }

    let http_client = ReqwestClient::with_timeout(config.http_timeout_secs)?;
    let pipeline = TileCheckerPipeline::new(config, http_client);
    let mut surface = PngFileSurface::new(&cli.output);

    let report = pipeline.run(&mut surface)?;
    info!(%report, output = %cli.output.display(), "pipeline complete");

    Ok(())
}
