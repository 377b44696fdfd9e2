use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::clean;

pub const MAX_HEADINGS: usize = 10;

pub static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
pub static H2: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static NON_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script, style, nav, footer, header").unwrap());
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Trimmed text of the first `MAX_HEADINGS` non-blank matches, in document order.
pub fn headings(doc: &Html, selector: &Selector) -> Vec<String> {
    doc.select(selector)
        .filter_map(|h| clean(&h.text().collect::<String>()))
        .take(MAX_HEADINGS)
        .collect()
}

/// Word count of the visible text, with script/style/nav/footer/header subtrees removed.
pub fn word_count(doc: &Html) -> usize {
    let mut working = doc.clone();
    let skipped: Vec<_> = working.select(&NON_CONTENT).map(|el| el.id()).collect();
    for id in skipped {
        if let Some(mut node) = working.tree.get_mut(id) {
            node.detach();
        }
    }

    let text = working.root_element().text().collect::<Vec<_>>().join(" ");
    WORD_RE.find_iter(&text).count()
}
