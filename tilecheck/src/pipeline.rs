//! End-to-end tile checker pipeline.
//!
//! ```text
//! catalog fetch ──► tile downloads ──► store listing ──► compositing ──► surface apply
//!  (all-or-nothing)  (skip &             (needs ≥ 2)      (8×8 checker)    (injected)
//!                     continue)
//! ```
//!
//! Stages run strictly in sequence on the calling thread. A catalog,
//! listing, compositing, or surface failure aborts the run; individual
//! tile download failures are absorbed by the downloader and only
//! surface later as an insufficient-tiles error if too few files remain.

use std::fmt;

use image::RgbaImage;
use tracing::{error, info};

use crate::catalog::{CatalogClient, CatalogError};
use crate::checker::{CheckerError, CheckerPattern, SOURCE_COUNT};
use crate::config::PipelineConfig;
use crate::download::{DownloadReport, TileDownloader};
use crate::http::HttpClient;
use crate::store::{StoreError, TileStore};
use crate::surface::{SurfaceError, TextureSurface};

/// Errors that can abort a pipeline run.
#[derive(Debug)]
pub enum PipelineError {
    /// Catalog fetch or parse failed.
    Catalog(CatalogError),

    /// Tile store listing failed or held too few tiles.
    Store(StoreError),

    /// Checker compositing failed.
    Checker(CheckerError),

    /// The surface rejected the composite texture.
    Surface(SurfaceError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Catalog(e) => write!(f, "catalog stage failed: {}", e),
            PipelineError::Store(e) => write!(f, "tile store stage failed: {}", e),
            PipelineError::Checker(e) => write!(f, "compositing stage failed: {}", e),
            PipelineError::Surface(e) => write!(f, "surface stage failed: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Catalog(e) => Some(e),
            PipelineError::Store(e) => Some(e),
            PipelineError::Checker(e) => Some(e),
            PipelineError::Surface(e) => Some(e),
        }
    }
}

impl From<CatalogError> for PipelineError {
    fn from(e: CatalogError) -> Self {
        PipelineError::Catalog(e)
    }
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        PipelineError::Store(e)
    }
}

impl From<CheckerError> for PipelineError {
    fn from(e: CheckerError) -> Self {
        PipelineError::Checker(e)
    }
}

impl From<SurfaceError> for PipelineError {
    fn from(e: SurfaceError) -> Self {
        PipelineError::Surface(e)
    }
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Number of descriptors in the fetched catalog.
    pub tiles_listed: usize,

    /// Download batch outcome.
    pub download: DownloadReport,

    /// Width and height of the applied composite.
    pub composite_size: (u32, u32),
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles listed, {}, composite {}x{}",
            self.tiles_listed, self.download, self.composite_size.0, self.composite_size.1
        )
    }
}

/// The tile checker pipeline.
///
/// Generic over [`HttpClient`] so the whole run can be driven by a mock
/// in tests. The surface is injected per run.
pub struct TileCheckerPipeline<C: HttpClient + Clone> {
    config: PipelineConfig,
    http_client: C,
}

impl<C: HttpClient + Clone> TileCheckerPipeline<C> {
    /// Creates a pipeline with the given configuration and HTTP client.
    pub fn new(config: PipelineConfig, http_client: C) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Runs the full pipeline and applies the composite to `surface`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal stage error; see the module docs for which
    /// failures are fatal. On error no composite is applied.
    pub fn run<S: TextureSurface>(&self, surface: &mut S) -> Result<PipelineReport, PipelineError> {
        let (tiles_listed, download, composite) = self.compose()?;
        let composite_size = composite.dimensions();

        surface.apply_texture(&composite).map_err(|e| {
            error!(error = %e, "failed to apply composite to surface");
            PipelineError::from(e)
        })?;

        Ok(PipelineReport {
            tiles_listed,
            download,
            composite_size,
        })
    }

    /// Runs the fetch, download, and compositing stages.
    ///
    /// Split from [`run`](Self::run) so callers that are not attached to a
    /// render surface can still produce the composite image.
    fn compose(&self) -> Result<(usize, DownloadReport, RgbaImage), PipelineError> {
        let catalog = CatalogClient::new(self.http_client.clone(), self.config.api_url.as_str());
        let tiles = catalog.fetch().map_err(|e| {
            error!(error = %e, "failed to fetch tile catalog");
            PipelineError::from(e)
        })?;
        info!(count = tiles.len(), "fetched tile catalog");

        let store = TileStore::new(&self.config.tile_dir);
        let downloader = TileDownloader::new(self.http_client.clone(), store.clone());
        let download = downloader.download_all(&tiles);
        info!(%download, "tile downloads finished");

        let sources = store.list_tiles_at_least(SOURCE_COUNT).map_err(|e| {
            error!(error = %e, "not enough tiles to composite");
            PipelineError::from(e)
        })?;

        let pattern = CheckerPattern::new(self.config.pattern_size);
        let composite = pattern.compose_from_files(&sources)?;

        Ok((tiles.len(), download, composite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;
    use crate::http::HttpError;
    use crate::surface::tests::CapturingSurface;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;

    const API_URL: &str = "http://api.test/gettiles";

    fn png_fixture(side: u32, color: [u8; 4]) -> Vec<u8> {
        let mut img = RgbaImage::new(side, side);
        for pixel in img.pixels_mut() {
            *pixel = Rgba(color);
        }
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn two_tile_catalog() -> Vec<u8> {
        br#"[
            {"url": "http://h/a.png", "width": 16, "height": 16},
            {"url": "http://h/b.png", "width": 16, "height": 16}
        ]"#
        .to_vec()
    }

    fn pipeline_with(
        dir: &TempDir,
        mock: MockHttpClient,
    ) -> TileCheckerPipeline<Arc<MockHttpClient>> {
        let config = PipelineConfig::default()
            .with_api_url(API_URL)
            .with_tile_dir(dir.path().join("Tiles"));
        TileCheckerPipeline::new(config, Arc::new(mock))
    }

    #[test]
    fn test_run_two_tile_scenario() {
        let dir = TempDir::new().unwrap();
        let mock = MockHttpClient::new()
            .with_response(API_URL, two_tile_catalog())
            .with_response("http://h/a.png", png_fixture(16, [255, 0, 0, 255]))
            .with_response("http://h/b.png", png_fixture(16, [0, 0, 255, 255]));
        let pipeline = pipeline_with(&dir, mock);
        let mut surface = CapturingSurface::default();

        let report = pipeline.run(&mut surface).unwrap();

        assert_eq!(report.tiles_listed, 2);
        assert_eq!(report.download.saved, 2);
        assert_eq!(report.composite_size, (128, 128));
        assert!(dir.path().join("Tiles/Tile0.png").exists());
        assert!(dir.path().join("Tiles/Tile1.png").exists());

        // The applied texture is a red/blue checkerboard.
        let applied = &surface.applied[0];
        assert_eq!(*applied.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*applied.get_pixel(16, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*applied.get_pixel(0, 16), Rgba([0, 0, 255, 255]));
        assert_eq!(*applied.get_pixel(16, 16), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_run_catalog_http_500_aborts_without_files() {
        let dir = TempDir::new().unwrap();
        let mock = MockHttpClient::new().with_error(
            API_URL,
            HttpError::Status {
                url: API_URL.to_string(),
                status: 500,
            },
        );
        let pipeline = pipeline_with(&dir, mock);
        let mut surface = CapturingSurface::default();

        let result = pipeline.run(&mut surface);

        assert!(matches!(
            result,
            Err(PipelineError::Catalog(CatalogError::Http(_)))
        ));
        assert!(!dir.path().join("Tiles").exists());
        assert!(surface.applied.is_empty());
    }

    #[test]
    fn test_run_one_tile_404_leaves_insufficient_tiles() {
        let dir = TempDir::new().unwrap();
        // b.png is unregistered: the mock serves 404 for it.
        let mock = MockHttpClient::new()
            .with_response(API_URL, two_tile_catalog())
            .with_response("http://h/a.png", png_fixture(16, [255, 0, 0, 255]));
        let pipeline = pipeline_with(&dir, mock);
        let mut surface = CapturingSurface::default();

        let result = pipeline.run(&mut surface);

        assert!(matches!(
            result,
            Err(PipelineError::Store(StoreError::InsufficientTiles {
                found: 1,
                needed: 2
            }))
        ));
        assert!(dir.path().join("Tiles/Tile0.png").exists());
        assert!(surface.applied.is_empty());
    }

    #[test]
    fn test_run_empty_catalog_is_insufficient() {
        let dir = TempDir::new().unwrap();
        let mock = MockHttpClient::new().with_response(API_URL, b"[]".to_vec());
        let pipeline = pipeline_with(&dir, mock);
        let mut surface = CapturingSurface::default();

        let result = pipeline.run(&mut surface);
        assert!(matches!(
            result,
            Err(PipelineError::Store(StoreError::InsufficientTiles {
                found: 0,
                needed: 2
            }))
        ));
    }

    #[test]
    fn test_run_surface_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mock = MockHttpClient::new()
            .with_response(API_URL, two_tile_catalog())
            .with_response("http://h/a.png", png_fixture(4, [1, 1, 1, 255]))
            .with_response("http://h/b.png", png_fixture(4, [2, 2, 2, 255]));
        let pipeline = pipeline_with(&dir, mock);
        let mut surface = CapturingSurface {
            fail_with: Some("host gone".to_string()),
            ..CapturingSurface::default()
        };

        let result = pipeline.run(&mut surface);
        assert!(matches!(result, Err(PipelineError::Surface(_))));
    }

    #[test]
    fn test_run_is_sequential_catalog_then_tiles_in_order() {
        let dir = TempDir::new().unwrap();
        let mock = MockHttpClient::new()
            .with_response(API_URL, two_tile_catalog())
            .with_response("http://h/a.png", png_fixture(4, [1, 1, 1, 255]))
            .with_response("http://h/b.png", png_fixture(4, [2, 2, 2, 255]));
        let pipeline = pipeline_with(&dir, mock);
        let mut surface = CapturingSurface::default();

        pipeline.run(&mut surface).unwrap();

        assert_eq!(
            pipeline.http_client.requested_urls(),
            vec![API_URL, "http://h/a.png", "http://h/b.png"]
        );
    }

    #[test]
    fn test_rerun_overwrites_previous_tiles() {
        let dir = TempDir::new().unwrap();
        let mock = MockHttpClient::new()
            .with_response(API_URL, two_tile_catalog())
            .with_response("http://h/a.png", png_fixture(4, [1, 1, 1, 255]))
            .with_response("http://h/b.png", png_fixture(4, [2, 2, 2, 255]));
        let pipeline = pipeline_with(&dir, mock);

        let mut surface = CapturingSurface::default();
        pipeline.run(&mut surface).unwrap();
        pipeline.run(&mut surface).unwrap();

        assert_eq!(surface.applied.len(), 2);
        let store = TileStore::new(dir.path().join("Tiles"));
        assert_eq!(store.list_tiles().unwrap().len(), 2);
    }
}
