//! Fetch a page, extract its SEO metadata, and classify it into topics.

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod pipeline;

pub use classify::{Classifier, TopicClassification, TopicDictionary};
pub use config::{FetcherConfig, Settings};
pub use error::{BuildError, CrawlError, FetchError, FetchErrorKind};
pub use extract::{extract, PageMetadata};
pub use fetcher::{FetchedPage, Fetcher};
pub use pipeline::{validate_url, BatchReport, CrawlResponse, Pipeline};
