//! Readable-text extraction from HTML.
//!
//! Picks the most specific content container present (`<article>`, then
//! `<main>`, then `<body>`), drops text under boilerplate elements, and
//! collapses whitespace. The title comes from `<title>`, falling back to the
//! first `<h1>`, then to the URL itself.

use cite_core::Page;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never counts as page content.
const SKIPPED: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "nav", "header", "footer", "aside", "form",
];

/// Content containers, most specific first.
const CONTAINERS: &[&str] = &["article", "main", "body"];

/// Extract a [`Page`] from an HTML document.
#[must_use]
pub fn extract_page(html: &str, url: &str) -> Page {
    let doc = Html::parse_document(html);

    let title = ["title", "h1"]
        .iter()
        .find_map(|sel| first_text(&doc, sel))
        .unwrap_or_else(|| url.to_string());

    let text = CONTAINERS
        .iter()
        .find_map(|sel| {
            let selector = Selector::parse(sel).ok()?;
            let root = doc.select(&selector).next()?;
            let text = readable_text(root);
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_default();

    Page {
        url: url.to_string(),
        title,
        text,
    }
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = doc.select(&selector).next()?;
    let text = collapse(&element.text().collect::<Vec<_>>().join(" "));
    (!text.is_empty()).then_some(text)
}

fn readable_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        // Only ancestors inside the container decide; a page-wide <form>
        // wrapper must not blank the whole document.
        let skipped = node
            .ancestors()
            .take_while(|a| a.id() != root.id())
            .any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| SKIPPED.contains(&e.name()))
            });
        if !skipped {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse(&out)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
