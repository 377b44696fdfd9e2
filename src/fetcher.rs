use std::error::Error as StdError;

use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use tracing::{debug, info, warn};

use crate::config::FetcherConfig;
use crate::error::FetchError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANG: &str = "en-US,en;q=0.5";

/// A successfully fetched page. The body is the full decoded text.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    pub byte_length: usize,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
}

/// HTTP retrieval with timeout, redirect and size limits. Built once, shared by reference.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: Client,
    max_content_length: usize,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANG));

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .gzip(true)
            .deflate(true)
            .redirect(Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            max_content_length: config.max_content_length,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let result = self.fetch_inner(url).await;
        if let Err(e) = &result {
            warn!(url, kind = ?e.kind(), "fetch failed: {}", e);
        }
        result
    }

    async fn fetch_inner(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Reject on the declared length before reading anything.
        if let Some(declared) = response.content_length() {
            if declared > self.max_content_length as u64 {
                debug!(url, declared, "declared length over cap");
                return Err(self.too_large(declared));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| map_reqwest_error(url, e))?
        {
            let observed = buf.len() + chunk.len();
            if observed > self.max_content_length {
                debug!(url, observed, "streamed body over cap, dropping");
                return Err(self.too_large(observed as u64));
            }
            buf.extend_from_slice(&chunk);
        }

        let byte_length = buf.len();
        let body = decode_body(&buf, content_type.as_deref());
        info!("Fetched {} ({} bytes)", url, byte_length);

        Ok(FetchedPage {
            body,
            byte_length,
            final_url,
            status: status.as_u16(),
            content_type,
        })
    }

    fn too_large(&self, size: u64) -> FetchError {
        FetchError::ContentTooLarge {
            size,
            limit: self.max_content_length,
        }
    }
}

/// Decode by the `charset=` of the Content-Type, UTF-8 when absent or unknown.
/// A byte-order mark wins over the declared charset.
fn decode_body(buf: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(buf);
    text.into_owned()
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_redirect() {
        FetchError::Request(format!("too many redirects: {}", error_chain(&err)))
    } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
        FetchError::Request(error_chain(&err))
    } else {
        FetchError::Unknown {
            url: url.to_string(),
            message: error_chain(&err),
        }
    }
}

/// reqwest's own Display is terse; the useful part (DNS, TLS, reset) sits in the sources.
fn error_chain(err: &dyn StdError) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
