//! Checkerboard compositing of downloaded tiles.
//!
//! Two source tiles are tiled into a `pattern_size` × `pattern_size`
//! grid, alternating by coordinate parity: cell `(x, y)` is filled with
//! source `(x + y) % 2`. With the default pattern size of 8 and square
//! tiles of side `T`, the composite is `8T × 8T`.
//!
//! The tile side is taken from the width of the first loaded image. Both
//! sources are assumed square and equal in size; mismatched inputs produce
//! a garbled pattern rather than an error, matching the persisted-tile
//! contract (the downloader re-encodes whatever the catalog served).

use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::debug;

/// Number of cells per side in the default checker pattern.
pub const DEFAULT_PATTERN_SIZE: u32 = 8;

/// Number of source images a checker pattern alternates between.
pub const SOURCE_COUNT: usize = 2;

/// Errors that can occur while compositing the checker pattern.
#[derive(Debug)]
pub enum CheckerError {
    /// Fewer than two source paths were supplied.
    InsufficientSources { found: usize },

    /// A source image could not be opened or decoded.
    Decode { path: PathBuf, message: String },
}

impl fmt::Display for CheckerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckerError::InsufficientSources { found } => {
                write!(
                    f,
                    "not enough source images for checker pattern: found {}, need {}",
                    found, SOURCE_COUNT
                )
            }
            CheckerError::Decode { path, message } => {
                write!(f, "failed to decode {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for CheckerError {}

/// Checkerboard compositor.
#[derive(Debug, Clone, Copy)]
pub struct CheckerPattern {
    pattern_size: u32,
}

impl Default for CheckerPattern {
    fn default() -> Self {
        Self {
            pattern_size: DEFAULT_PATTERN_SIZE,
        }
    }
}

impl CheckerPattern {
    /// Creates a compositor with the given cells-per-side count.
    pub fn new(pattern_size: u32) -> Self {
        Self { pattern_size }
    }

    /// Returns the cells-per-side count.
    pub fn pattern_size(&self) -> u32 {
        self.pattern_size
    }

    /// Composites the first two of the given source files into a checker
    /// pattern.
    ///
    /// Extra paths beyond the first two are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CheckerError::InsufficientSources` if fewer than two paths
    /// are supplied and `CheckerError::Decode` if either source fails to
    /// load. Both abort the pipeline; there is no partial composite.
    pub fn compose_from_files(&self, paths: &[PathBuf]) -> Result<RgbaImage, CheckerError> {
        if paths.len() < SOURCE_COUNT {
            return Err(CheckerError::InsufficientSources { found: paths.len() });
        }

        let first = load_source(&paths[0])?;
        let second = load_source(&paths[1])?;
        Ok(self.compose(&[first, second]))
    }

    /// Composites two already-decoded source images.
    ///
    /// The tile side is the width of `sources[0]`; both images are assumed
    /// square and equally sized.
    pub fn compose(&self, sources: &[RgbaImage; SOURCE_COUNT]) -> RgbaImage {
        let tile_size = sources[0].width();
        let side = self.pattern_size * tile_size;
        let mut composite = RgbaImage::new(side, side);

        debug!(
            tile_size,
            pattern_size = self.pattern_size,
            side,
            "compositing checker pattern"
        );

        for cell_y in 0..self.pattern_size {
            for cell_x in 0..self.pattern_size {
                let source = &sources[((cell_x + cell_y) % 2) as usize];
                copy_cell(&mut composite, source, cell_x * tile_size, cell_y * tile_size);
            }
        }

        composite
    }
}

/// Copies a full source tile into the composite at the given pixel offset.
///
/// Straight per-pixel copy; no blending or alpha compositing. Reads are
/// clamped to the source dimensions so an undersized second tile cannot
/// read out of bounds.
fn copy_cell(composite: &mut RgbaImage, source: &RgbaImage, offset_x: u32, offset_y: u32) {
    let width = source.width().min(composite.width() - offset_x);
    let height = source.height().min(composite.height() - offset_y);

    for ty in 0..height {
        for tx in 0..width {
            let pixel = *source.get_pixel(tx, ty);
            composite.put_pixel(offset_x + tx, offset_y + ty, pixel);
        }
    }
}

fn load_source(path: &Path) -> Result<RgbaImage, CheckerError> {
    let image = image::open(path).map_err(|e| CheckerError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}
