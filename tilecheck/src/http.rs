//! HTTP client abstraction for testability.
//!
//! All network access in the pipeline goes through the [`HttpClient`] trait
//! so that the catalog and downloader can be exercised in tests with canned
//! responses instead of a live endpoint.

use std::fmt;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur during HTTP operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The underlying client could not be constructed.
    ClientBuild(String),

    /// The request failed at the transport level (DNS, TLS, connection).
    Transport { url: String, message: String },

    /// The server answered with a non-success status code.
    Status { url: String, status: u16 },

    /// The response body could not be read.
    Body { url: String, message: String },
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::ClientBuild(msg) => write!(f, "failed to create HTTP client: {}", msg),
            HttpError::Transport { url, message } => {
                write!(f, "request to {} failed: {}", url, message)
            }
            HttpError::Status { url, status } => write!(f, "HTTP {} from {}", status, url),
            HttpError::Body { url, message } => {
                write!(f, "failed to read response from {}: {}", url, message)
            }
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP GET operations.
///
/// The pipeline performs one request at a time, suspending the calling
/// thread until the response is complete, so the trait is blocking by
/// design.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status code,
    /// or an unreadable body.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

/// Clients behind an `Arc` are clients too; the pipeline hands one
/// client to both the catalog and the downloader this way.
impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.as_ref().get(url)
    }
}

/// Real HTTP client implementation using reqwest's blocking API.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new client with a custom timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.client.get(url).send().map_err(|e| HttpError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| HttpError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}
