use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a fetch can fail. Returned as data; the Fetcher never panics or retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Timeout fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// `size` is the declared Content-Length when the server sent one. For a streamed
    /// body it is the byte count at the chunk that crossed `limit`, so it may be less than
    /// the full response: reading stops there and the rest is never buffered.
    #[error("Content too large: {size} bytes")]
    ContentTooLarge { size: u64, limit: usize },

    #[error("Request error: {0}")]
    Request(String),

    #[error("Error fetching {url}: {message}")]
    Unknown { url: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Timeout,
    HttpStatus,
    ContentTooLarge,
    Request,
    Unknown,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Timeout { .. } => FetchErrorKind::Timeout,
            FetchError::HttpStatus { .. } => FetchErrorKind::HttpStatus,
            FetchError::ContentTooLarge { .. } => FetchErrorKind::ContentTooLarge,
            FetchError::Request(_) => FetchErrorKind::Request,
            FetchError::Unknown { .. } => FetchErrorKind::Unknown,
        }
    }
}

impl FetchErrorKind {
    /// Whether a caller may reasonably try again. Nothing in this crate retries.
    pub fn is_retryable(self) -> bool {
        matches!(self, FetchErrorKind::Timeout)
    }
}

/// Failures of the outer crawl layer, before the Fetcher is reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrawlError {
    #[error("invalid URL {0}")]
    InvalidUrl(String),

    #[error("Maximum {limit} URLs per batch (got {given})")]
    BatchTooLarge { given: usize, limit: usize },
}

/// Failures while building the long-lived pipeline parts at startup.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid topic dictionary: {0}")]
    Dictionary(#[from] regex::Error),
}
