pub mod body;
pub mod meta;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::info;

/// SEO-relevant fields of one document. Text fields are trimmed and never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub author: Option<String>,
    pub canonical_url: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub language: Option<String>,
    pub word_count: usize,
}

const TITLE_WEIGHT: usize = 3;
const DESCRIPTION_WEIGHT: usize = 2;
const H1_WEIGHT: usize = 2;

impl PageMetadata {
    /// Classification corpus: each field repeated by its weight
    /// (title x3, description x2, keyword x1, h1 x2, h2 x1), space-joined.
    pub fn weighted_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(title) = &self.title {
            parts.extend(std::iter::repeat(title.as_str()).take(TITLE_WEIGHT));
        }
        if let Some(description) = &self.description {
            parts.extend(std::iter::repeat(description.as_str()).take(DESCRIPTION_WEIGHT));
        }
        parts.extend(self.keywords.iter().map(String::as_str));
        for h1 in &self.h1_tags {
            parts.extend(std::iter::repeat(h1.as_str()).take(H1_WEIGHT));
        }
        parts.extend(self.h2_tags.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// Parse markup into `PageMetadata`. Total: malformed or empty input gives empty fields.
pub fn extract(content: &str, source_url: &str) -> PageMetadata {
    let doc = Html::parse_document(content);

    let metadata = PageMetadata {
        title: meta::title(&doc),
        description: meta::named(&doc, "description"),
        keywords: meta::keywords(&doc),
        author: meta::named(&doc, "author"),
        canonical_url: meta::canonical(&doc),
        og_title: meta::open_graph(&doc, "og:title"),
        og_description: meta::open_graph(&doc, "og:description"),
        og_image: meta::open_graph(&doc, "og:image"),
        h1_tags: body::headings(&doc, &body::H1),
        h2_tags: body::headings(&doc, &body::H2),
        language: meta::language(&doc),
        word_count: body::word_count(&doc),
    };

    info!("Extracted metadata from {}", source_url);
    metadata
}

fn clean(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
