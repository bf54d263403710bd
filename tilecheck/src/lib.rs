//! Tilecheck - remote tile download and checkerboard compositing
//!
//! This library fetches a catalog of image tiles from a remote endpoint,
//! downloads each tile to local PNG storage, and composites two of the
//! stored tiles into an 8×8 checkerboard texture for a render surface.
//!
//! # Pipeline
//!
//! ```text
//! CatalogClient ──► TileDownloader ──► TileStore ──► CheckerPattern ──► TextureSurface
//! ```
//!
//! See [`pipeline::TileCheckerPipeline`] for the end-to-end entry point.

pub mod catalog;
pub mod checker;
pub mod config;
pub mod download;
pub mod http;
pub mod pipeline;
pub mod store;
pub mod surface;
pub mod telemetry;

pub use catalog::{CatalogClient, CatalogError, TileDescriptor};
pub use checker::{CheckerError, CheckerPattern, DEFAULT_PATTERN_SIZE};
pub use config::{PipelineConfig, DEFAULT_API_URL};
pub use download::{DownloadError, DownloadReport, TileDownloader};
pub use http::{HttpClient, HttpError, ReqwestClient};
pub use pipeline::{PipelineError, PipelineReport, TileCheckerPipeline};
pub use store::{StoreError, TileStore};
pub use surface::{PngFileSurface, SurfaceError, TextureSurface};
