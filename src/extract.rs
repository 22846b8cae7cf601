//! Main content extraction.
//!
//! Readability (via `dom_smoothie`) picks the article out of the page and strips
//! navigation and other boilerplate. The cleaned article markup is then flattened to
//! plain text, one block per line.

use dom_smoothie::{Config, Readability};
use scraper::{ElementRef, Html};
use tracing::debug;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section",
    "table", "td", "th", "tr", "ul",
];

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts the main readable text of `html`, or `None` when nothing readable remains.
pub fn extract_main_text(html: &str, url: Option<&str>) -> Option<String> {
    let cfg = Config {
        max_elements_to_parse: 9000,
        ..Default::default()
    };

    let mut readability = match Readability::new(html, url, Some(cfg)) {
        Ok(readability) => readability,
        Err(e) => {
            debug!(error = %e, "readability setup failed");
            return None;
        }
    };
    let article = match readability.parse() {
        Ok(article) => article,
        Err(e) => {
            debug!(error = %e, "no readable content");
            return None;
        }
    };

    let text = flatten(&article.content);
    if text.is_empty() { None } else { Some(text) }
}

/// Visible text of an HTML fragment, one block per line with inner whitespace collapsed.
fn flatten(fragment: &str) -> String {
    let fragment = Html::parse_fragment(fragment);
    let mut raw = String::new();
    collect_text(fragment.root_element(), &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if SKIPPED_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(child_element, out);
            if block {
                out.push('\n');
            }
        }
    }
}
