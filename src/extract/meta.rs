use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::clean;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static CANONICAL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel~="canonical"]"#).unwrap());

/// `<title>` text, falling back to `og:title` when the tag is missing or blank.
pub fn title(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .and_then(|t| clean(&t.text().collect::<String>()))
        .or_else(|| open_graph(doc, "og:title"))
}

/// First `meta[name=key]`; if that one has no usable content, first `meta[property=key]`.
pub fn named(doc: &Html, key: &str) -> Option<String> {
    meta_content(doc, "name", key).or_else(|| meta_content(doc, "property", key))
}

pub fn open_graph(doc: &Html, property: &str) -> Option<String> {
    meta_content(doc, "property", property)
}

pub fn keywords(doc: &Html) -> Vec<String> {
    named(doc, "keywords")
        .map(|raw| raw.split(',').filter_map(clean).collect())
        .unwrap_or_default()
}

pub fn canonical(doc: &Html) -> Option<String> {
    doc.select(&CANONICAL)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(clean)
}

/// `lang` on `<html>`, or `xml:lang` when `lang` is absent or blank.
pub fn language(doc: &Html) -> Option<String> {
    let html = doc.root_element().value();
    html.attr("lang")
        .and_then(clean)
        .or_else(|| html.attr("xml:lang").and_then(clean))
}

fn meta_content(doc: &Html, attr: &str, key: &str) -> Option<String> {
    doc.select(&META)
        .find(|m| m.value().attr(attr) == Some(key))
        .and_then(|m| m.value().attr("content"))
        .and_then(clean)
}
