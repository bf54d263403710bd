//! Sequential tile downloading.
//!
//! Tiles are fetched one at a time in catalog order, decoded, re-encoded
//! as PNG, and handed to the [`TileStore`] under their fetch index. A
//! failure on one tile is logged and skipped; the batch keeps going. This
//! is deliberately the opposite of the catalog fetch, where any failure
//! aborts the pipeline.

use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;

use image::ImageFormat;
use tracing::{debug, warn};

use crate::catalog::TileDescriptor;
use crate::http::{HttpClient, HttpError};
use crate::store::{StoreError, TileStore};

/// Errors that can occur while downloading a single tile.
#[derive(Debug)]
pub enum DownloadError {
    /// The tile request failed (transport or HTTP status).
    Http(HttpError),

    /// The response body could not be decoded as an image.
    Decode { url: String, message: String },

    /// The decoded image could not be re-encoded as PNG.
    Encode { url: String, message: String },

    /// The PNG bytes could not be persisted.
    Store(StoreError),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Http(e) => write!(f, "failed to download tile: {}", e),
            DownloadError::Decode { url, message } => {
                write!(f, "failed to decode tile from {}: {}", url, message)
            }
            DownloadError::Encode { url, message } => {
                write!(f, "failed to encode tile from {} as PNG: {}", url, message)
            }
            DownloadError::Store(e) => write!(f, "failed to store tile: {}", e),
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Http(e) => Some(e),
            DownloadError::Decode { .. } | DownloadError::Encode { .. } => None,
            DownloadError::Store(e) => Some(e),
        }
    }
}

impl From<HttpError> for DownloadError {
    fn from(e: HttpError) -> Self {
        DownloadError::Http(e)
    }
}

impl From<StoreError> for DownloadError {
    fn from(e: StoreError) -> Self {
        DownloadError::Store(e)
    }
}

/// Outcome of a download batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Number of tiles attempted (always the catalog length).
    pub attempted: usize,

    /// Number of tiles successfully written to the store.
    pub saved: usize,

    /// Number of tiles skipped after a failure.
    pub failed: usize,
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "downloaded {}/{} tiles ({} failed)",
            self.saved, self.attempted, self.failed
        )
    }
}

/// Downloads catalog tiles into a [`TileStore`], one at a time.
pub struct TileDownloader<C: HttpClient> {
    http_client: C,
    store: TileStore,
}

impl<C: HttpClient> TileDownloader<C> {
    /// Creates a downloader writing into the given store.
    pub fn new(http_client: C, store: TileStore) -> Self {
        Self { http_client, store }
    }

    /// Downloads every catalog entry, strictly sequentially.
    ///
    /// Each descriptor is attempted exactly once. Failures are logged via
    /// `tracing::warn!` and counted in the report; they never abort the
    /// batch.
    pub fn download_all(&self, tiles: &[TileDescriptor]) -> DownloadReport {
        let mut report = DownloadReport {
            attempted: tiles.len(),
            ..DownloadReport::default()
        };

        for (index, tile) in tiles.iter().enumerate() {
            match self.download_tile(tile, index) {
                Ok(path) => {
                    debug!(index, url = %tile.url, path = %path.display(), "saved tile");
                    report.saved += 1;
                }
                Err(e) => {
                    warn!(index, url = %tile.url, error = %e, "skipping tile");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Downloads one tile and persists it as `Tile<index>.png`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch, image decode, PNG encode, or store
    /// write fails. Callers decide whether that aborts anything; this
    /// method only reports.
    pub fn download_tile(
        &self,
        tile: &TileDescriptor,
        index: usize,
    ) -> Result<PathBuf, DownloadError> {
        let bytes = self.http_client.get(&tile.url)?;

        let decoded = image::load_from_memory(&bytes).map_err(|e| DownloadError::Decode {
            url: tile.url.clone(),
            message: e.to_string(),
        })?;

        let mut png_bytes = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| DownloadError::Encode {
                url: tile.url.clone(),
                message: e.to_string(),
            })?;

        Ok(self.store.write_tile(index, &png_bytes)?)
    }
}
