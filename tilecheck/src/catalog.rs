//! Tile catalog retrieval.
//!
//! The remote endpoint serves a JSON array of tile descriptors:
//!
//! ```json
//! [{ "url": "https://host/tile.jpg", "width": 600, "height": 600 }, ...]
//! ```
//!
//! Fetching the catalog is all-or-nothing: a transport failure, a
//! non-success status, or malformed JSON aborts the whole pipeline. This
//! differs from individual tile downloads, which are skip-and-continue.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::http::{HttpClient, HttpError};

/// A single tile entry from the remote catalog.
///
/// `width` and `height` are carried as reported by the endpoint but the
/// compositor derives the actual tile size from the decoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDescriptor {
    /// Source URL of the tile image.
    pub url: String,

    /// Reported width in pixels.
    pub width: u32,

    /// Reported height in pixels.
    pub height: u32,
}

/// Errors that can occur while fetching the tile catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog request failed (transport or HTTP status).
    Http(HttpError),

    /// The response body was not a valid JSON array of descriptors.
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Http(e) => write!(f, "failed to fetch tile catalog: {}", e),
            CatalogError::Parse(e) => write!(f, "failed to parse tile catalog: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Http(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
        }
    }
}

impl From<HttpError> for CatalogError {
    fn from(e: HttpError) -> Self {
        CatalogError::Http(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

/// Client for the remote tile catalog endpoint.
pub struct CatalogClient<C: HttpClient> {
    http_client: C,
    api_url: String,
}

impl<C: HttpClient> CatalogClient<C> {
    /// Creates a new catalog client for the given endpoint.
    pub fn new(http_client: C, api_url: impl Into<String>) -> Self {
        Self {
            http_client,
            api_url: api_url.into(),
        }
    }

    /// Fetches and parses the tile catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the request fails and
    /// `CatalogError::Parse` if the body is not a JSON array of
    /// descriptors. Both are fatal to the pipeline.
    pub fn fetch(&self) -> Result<Vec<TileDescriptor>, CatalogError> {
        let body = self.http_client.get(&self.api_url)?;
        let tiles: Vec<TileDescriptor> = serde_json::from_slice(&body)?;

        debug!(count = tiles.len(), url = %self.api_url, "fetched tile catalog");
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;

    const API_URL: &str = "http://api.test/gettiles";

    #[test]
    fn test_fetch_parses_descriptor_array() {
        let json = br#"[
            {"url": "http://h/a.png", "width": 16, "height": 16},
            {"url": "http://h/b.png", "width": 16, "height": 16}
        ]"#;
        let mock = MockHttpClient::new().with_response(API_URL, json.to_vec());
        let client = CatalogClient::new(mock, API_URL);

        let tiles = client.fetch().unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].url, "http://h/a.png");
        assert_eq!(tiles[0].width, 16);
        assert_eq!(tiles[1].url, "http://h/b.png");
    }

    #[test]
    fn test_fetch_empty_array_is_ok() {
        let mock = MockHttpClient::new().with_response(API_URL, b"[]".to_vec());
        let client = CatalogClient::new(mock, API_URL);

        let tiles = client.fetch().unwrap();
        assert!(tiles.is_empty());
    }

    #[test]
    fn test_fetch_http_error_is_fatal() {
        let mock = MockHttpClient::new().with_error(
            API_URL,
            HttpError::Status {
                url: API_URL.to_string(),
                status: 500,
            },
        );
        let client = CatalogClient::new(mock, API_URL);

        let result = client.fetch();
        assert!(matches!(result, Err(CatalogError::Http(_))));
    }

    #[test]
    fn test_fetch_malformed_json_is_parse_error() {
        let mock = MockHttpClient::new().with_response(API_URL, b"not json".to_vec());
        let client = CatalogClient::new(mock, API_URL);

        let result = client.fetch();
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_fetch_object_body_is_parse_error() {
        // A JSON object instead of the expected array.
        let mock =
            MockHttpClient::new().with_response(API_URL, br#"{"tiles": []}"#.to_vec());
        let client = CatalogClient::new(mock, API_URL);

        let result = client.fetch();
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
