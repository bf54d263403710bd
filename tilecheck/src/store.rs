//! Local tile storage.
//!
//! Downloaded tiles are persisted as `Tile<i>.png` under a single flat
//! directory, where `i` is the fetch-order index assigned by the
//! downloader. Files are overwritten on every run; nothing is ever deleted.
//!
//! # Listing order
//!
//! Raw directory listings are filesystem-ordered, which diverges from
//! numeric index order once ten or more tiles exist (`Tile10.png` sorts
//! before `Tile2.png` lexically). [`TileStore::list_tiles`] therefore
//! parses the index out of each filename and sorts numerically, so callers
//! always see tiles in the same order the downloader wrote them. Files
//! that do not match the `Tile<i>.png` shape are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Filename prefix for persisted tiles.
const TILE_PREFIX: &str = "Tile";

/// Filename extension for persisted tiles.
const TILE_EXTENSION: &str = "png";

/// Errors that can occur during tile storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while creating, writing, or listing the tile directory.
    #[error("I/O error in tile store: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer than the required number of tile files are present.
    #[error("not enough tile files available: found {found}, need {needed}")]
    InsufficientTiles { found: usize, needed: usize },
}

/// Flat on-disk store for downloaded tiles.
#[derive(Debug, Clone)]
pub struct TileStore {
    root: PathBuf,
}

impl TileStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory is not touched until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path a tile with the given fetch index is stored at.
    pub fn tile_path(&self, index: usize) -> PathBuf {
        self.root
            .join(format!("{}{}.{}", TILE_PREFIX, index, TILE_EXTENSION))
    }

    /// Writes PNG bytes for the tile at the given fetch index.
    ///
    /// Creates the store directory (and any missing parents) on first use;
    /// pre-existing directories are tolerated. An existing file at the same
    /// index is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if directory creation or the write fails.
    pub fn write_tile(&self, index: usize, png_bytes: &[u8]) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root)?;

        let path = self.tile_path(index);
        fs::write(&path, png_bytes)?;

        debug!(path = %path.display(), bytes = png_bytes.len(), "wrote tile");
        Ok(path)
    }

    /// Lists stored tile files in numeric index order.
    ///
    /// Only regular files matching `Tile<i>.png` directly under the store
    /// root are returned; anything else in the directory is skipped. A
    /// missing store directory yields an empty list rather than an error,
    /// since it is indistinguishable from "no tiles downloaded yet".
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be read.
    pub fn list_tiles(&self) -> Result<Vec<PathBuf>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut indexed: Vec<(usize, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(index) = parse_tile_index(&path) {
                indexed.push((index, path));
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, path)| path).collect())
    }

    /// Lists stored tiles, requiring at least `needed` of them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InsufficientTiles` if fewer than `needed`
    /// tile files are present.
    pub fn list_tiles_at_least(&self, needed: usize) -> Result<Vec<PathBuf>, StoreError> {
        let tiles = self.list_tiles()?;
        if tiles.len() < needed {
            return Err(StoreError::InsufficientTiles {
                found: tiles.len(),
                needed,
            });
        }
        Ok(tiles)
    }
}

/// Extracts the numeric index from a `Tile<i>.png` filename.
///
/// Returns `None` for names that do not match the downloader's naming
/// convention exactly.
fn parse_tile_index(path: &Path) -> Option<usize> {
    let stem = path.file_stem()?.to_str()?;
    let extension = path.extension()?.to_str()?;
    if !extension.eq_ignore_ascii_case(TILE_EXTENSION) {
        return None;
    }

    stem.strip_prefix(TILE_PREFIX)?.parse().ok()
}
