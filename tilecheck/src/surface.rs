//! Render-surface boundary.
//!
//! The surface a composite lands on is an injected handle rather than a
//! global name lookup against a live render host: whoever runs the
//! pipeline supplies a [`TextureSurface`] implementation, so the
//! compositing logic can be exercised without a host present.

use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::info;

/// Errors that can occur while applying a texture to a surface.
#[derive(Debug)]
pub enum SurfaceError {
    /// The target surface could not be resolved by the host.
    NotFound(String),

    /// The texture could not be committed to the surface.
    ApplyFailed(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::NotFound(name) => write!(f, "surface not found: {}", name),
            SurfaceError::ApplyFailed(msg) => write!(f, "failed to apply texture: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// A render surface that can receive a composite texture.
///
/// Implementations decide what "applying" means: a render host sets the
/// object's main texture, the CLI writes a PNG, tests capture the image.
pub trait TextureSurface {
    /// Assigns the given image as this surface's visible texture.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError` if the surface rejects the texture. This is
    /// fatal to the pipeline.
    fn apply_texture(&mut self, texture: &RgbaImage) -> Result<(), SurfaceError>;
}

/// Surface backed by a PNG file on disk.
///
/// Stand-in for a render host: applying the texture writes it to the
/// configured path.
#[derive(Debug, Clone)]
pub struct PngFileSurface {
    path: PathBuf,
}

impl PngFileSurface {
    /// Creates a surface that writes to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextureSurface for PngFileSurface {
    fn apply_texture(&mut self, texture: &RgbaImage) -> Result<(), SurfaceError> {
        texture
            .save(&self.path)
            .map_err(|e| SurfaceError::ApplyFailed(format!("{}: {}", self.path.display(), e)))?;

        info!(path = %self.path.display(), "wrote composite texture");
        Ok(())
    }
}
