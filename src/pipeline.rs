use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use url::Url;

use crate::classify::{Classifier, TopicClassification};
use crate::config::Settings;
use crate::error::{BuildError, CrawlError, FetchErrorKind};
use crate::extract::{self, PageMetadata};
use crate::fetcher::Fetcher;

/// Outcome of one URL. Failures are data: `success = false` plus the error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResponse {
    pub url: String,
    pub success: bool,
    pub crawled_at: DateTime<Utc>,
    pub metadata: Option<PageMetadata>,
    pub classification: Option<TopicClassification>,
    pub error: Option<String>,
    pub error_kind: Option<FetchErrorKind>,
}

impl CrawlResponse {
    fn ok(url: &str, metadata: PageMetadata, classification: TopicClassification) -> Self {
        Self {
            url: url.to_string(),
            success: true,
            crawled_at: Utc::now(),
            metadata: Some(metadata),
            classification: Some(classification),
            error: None,
            error_kind: None,
        }
    }

    fn failed(url: &str, error: String, error_kind: Option<FetchErrorKind>) -> Self {
        Self {
            url: url.to_string(),
            success: false,
            crawled_at: Utc::now(),
            metadata: None,
            classification: None,
            error: Some(error),
            error_kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<CrawlResponse>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Absolute http(s) URL with a host.
pub fn validate_url(raw: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(raw.trim()).map_err(|e| CrawlError::InvalidUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlError::InvalidUrl(format!(
            "{raw}: unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(CrawlError::InvalidUrl(format!("{raw}: missing host")));
    }
    Ok(url)
}

/// Fetch -> extract -> classify. Built once per process; every crawl is independent.
pub struct Pipeline {
    fetcher: Fetcher,
    classifier: Classifier,
    batch_limit: usize,
    batch_concurrency: usize,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Result<Self, BuildError> {
        Ok(Self::from_parts(
            Fetcher::new(&settings.fetcher_config())?,
            Classifier::standard()?,
            settings,
        ))
    }

    pub fn from_parts(fetcher: Fetcher, classifier: Classifier, settings: &Settings) -> Self {
        Self {
            fetcher,
            classifier,
            batch_limit: settings.batch_limit,
            batch_concurrency: settings.batch_concurrency.max(1),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The response reports the URL as given (trimmed); the parsed form is only used to fetch.
    pub async fn crawl(&self, raw_url: &str) -> CrawlResponse {
        info!("Crawl request: {}", raw_url);
        let requested = raw_url.trim();
        let url = match validate_url(requested) {
            Ok(u) => u,
            Err(e) => return CrawlResponse::failed(requested, e.to_string(), None),
        };

        match self.fetcher.fetch(url.as_str()).await {
            Ok(page) => {
                let (metadata, classification) = self.inspect(&page.body, requested);
                CrawlResponse::ok(requested, metadata, classification)
            }
            Err(e) => CrawlResponse::failed(requested, e.to_string(), Some(e.kind())),
        }
    }

    /// Extract + classify markup that is already in hand.
    pub fn inspect(&self, html: &str, source_url: &str) -> (PageMetadata, TopicClassification) {
        let metadata = extract::extract(html, source_url);
        let classification = self.classifier.classify(&metadata);
        (metadata, classification)
    }

    /// Crawl up to `batch_limit` URLs, `batch_concurrency` at a time. Results keep input order.
    pub async fn crawl_batch(self: &Arc<Self>, urls: Vec<String>) -> Result<BatchReport, CrawlError> {
        self.crawl_batch_with(urls, |_| {}).await
    }

    /// Like `crawl_batch`, calling `on_done` as each URL finishes (in completion order).
    pub async fn crawl_batch_with<F>(
        self: &Arc<Self>,
        urls: Vec<String>,
        mut on_done: F,
    ) -> Result<BatchReport, CrawlError>
    where
        F: FnMut(&CrawlResponse),
    {
        if urls.len() > self.batch_limit {
            return Err(CrawlError::BatchTooLarge {
                given: urls.len(),
                limit: self.batch_limit,
            });
        }

        let total = urls.len();
        let semaphore = Arc::new(Semaphore::new(self.batch_concurrency));
        let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, CrawlResponse)>(total.max(1));

        for (idx, url) in urls.iter().enumerate() {
            let pipeline = Arc::clone(self);
            let sem = Arc::clone(&semaphore);
            let tx = tx.clone();
            let url = url.clone();

            tokio::spawn(async move {
                let response = match sem.acquire_owned().await {
                    Ok(_permit) => pipeline.crawl(&url).await,
                    Err(_) => CrawlResponse::failed(&url, "batch cancelled".to_string(), None),
                };
                let _ = tx.send((idx, response)).await;
            });
        }

        // rx closes once every task has sent and dropped its sender
        drop(tx);

        let mut slots: Vec<Option<CrawlResponse>> = vec![None; total];
        while let Some((idx, response)) = rx.recv().await {
            on_done(&response);
            slots[idx] = Some(response);
        }

        let results: Vec<CrawlResponse> = slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    warn!("Task for {} ended without a result", url);
                    CrawlResponse::failed(&url, "crawl task aborted".to_string(), None)
                })
            })
            .collect();

        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            "Batch crawled {} URLs ({} ok, {} failed)",
            total,
            succeeded,
            total - succeeded
        );

        Ok(BatchReport {
            results,
            total,
            succeeded,
            failed: total - succeeded,
        })
    }
}
