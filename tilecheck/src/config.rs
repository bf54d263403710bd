//! Pipeline configuration.
//!
//! All parameters have fixed defaults: the production catalog endpoint,
//! a `Tiles/` directory under the platform's persistent data root, and
//! an 8×8 pattern. The `with_` builders exist for the CLI overrides and
//! for tests.

use std::path::PathBuf;

use crate::checker::DEFAULT_PATTERN_SIZE;
use crate::http::DEFAULT_TIMEOUT_SECS;

/// Default tile catalog endpoint.
pub const DEFAULT_API_URL: &str = "https://quicklook.orientbell.com/Task/gettiles.php";

/// Subdirectory for downloaded tiles under the persistent data root.
const TILES_SUBDIR: &str = "Tiles";

/// Application directory name under the platform data root.
const APP_DIR: &str = "tilecheck";

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tile catalog endpoint URL.
    pub api_url: String,

    /// Directory downloaded tiles are persisted to.
    pub tile_dir: PathBuf,

    /// Cells per side in the checker pattern.
    pub pattern_size: u32,

    /// HTTP request timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            tile_dir: default_tile_dir(),
            pattern_size: DEFAULT_PATTERN_SIZE,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// Sets the catalog endpoint URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the tile storage directory.
    pub fn with_tile_dir(mut self, tile_dir: impl Into<PathBuf>) -> Self {
        self.tile_dir = tile_dir.into();
        self
    }

    /// Sets the checker pattern size.
    pub fn with_pattern_size(mut self, pattern_size: u32) -> Self {
        self.pattern_size = pattern_size;
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }
}

/// Returns the default tile directory: `<data dir>/tilecheck/Tiles`.
///
/// Falls back to a relative path when the platform exposes no data
/// directory (some containers and minimal environments).
pub fn default_tile_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(TILES_SUBDIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.pattern_size, 8);
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.tile_dir.ends_with("Tiles"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::default()
            .with_api_url("http://localhost/tiles")
            .with_tile_dir("/tmp/tiles")
            .with_pattern_size(4)
            .with_http_timeout_secs(5);

        assert_eq!(config.api_url, "http://localhost/tiles");
        assert_eq!(config.tile_dir, PathBuf::from("/tmp/tiles"));
        assert_eq!(config.pattern_size, 4);
        assert_eq!(config.http_timeout_secs, 5);
    }
}
