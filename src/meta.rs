//! Signals from `<head>` markup and page navigation aids.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::error::{AppError, Result};

pub const NO_TITLE: &str = "No title found";
pub const NO_META_DESCRIPTION: &str = "No meta description found";

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta").expect("Failed to parse meta selector")
});

static META_DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("Failed to parse meta description selector")
});

static META_ROBOTS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="robots"]"#).expect("Failed to parse meta robots selector")
});

static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"link[rel="canonical"]"#).expect("Failed to parse canonical selector")
});

static SCHEMA_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("Failed to parse schema selector")
});

static BREADCRUMB_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#".breadcrumbs, .breadcrumb, [itemtype="https://schema.org/BreadcrumbList"], nav[aria-label="Breadcrumb"]"#,
    )
    .expect("Failed to parse breadcrumb selector")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaTag {
    pub name: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleAnalysis {
    pub length: usize,
    pub contains_keyword: bool,
    /// 1-based character position of the first keyword match, 0 when absent.
    pub keyword_position: usize,
}

/// Text of the first `<title>`, trimmed, or the sentinel when absent or empty.
pub fn title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

pub fn analyze_title(title: &str, keyword: &str) -> TitleAnalysis {
    if title == NO_TITLE {
        return TitleAnalysis {
            length: 0,
            contains_keyword: false,
            keyword_position: 0,
        };
    }

    let lower = title.to_lowercase();
    let position = if keyword.is_empty() {
        None
    } else {
        lower
            .find(&keyword.to_lowercase())
            .map(|byte_index| lower[..byte_index].chars().count() + 1)
    };

    TitleAnalysis {
        length: title.chars().count(),
        contains_keyword: position.is_some(),
        keyword_position: position.unwrap_or(0),
    }
}

/// A description tag without a `content` attribute is malformed, not absent.
pub fn meta_description(document: &Html) -> Result<String> {
    match document.select(&META_DESCRIPTION_SELECTOR).next() {
        Some(element) => element
            .value()
            .attr("content")
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::AnalysisError("meta description tag has no content attribute".to_string())
            }),
        None => Ok(NO_META_DESCRIPTION.to_string()),
    }
}

/// Every `<meta>` carrying a `name` or `property`, in document order.
pub fn meta_tags(document: &Html) -> Vec<MetaTag> {
    document
        .select(&META_SELECTOR)
        .filter_map(|element| {
            let meta = element.value();
            let name = meta.attr("name").or_else(|| meta.attr("property"))?;
            Some(MetaTag {
                name: name.to_string(),
                content: meta.attr("content").map(str::to_string),
            })
        })
        .collect()
}

pub fn tags_with_prefix(tags: &[MetaTag], prefix: &str) -> Vec<MetaTag> {
    tags.iter()
        .filter(|tag| tag.name.starts_with(prefix))
        .cloned()
        .collect()
}

pub fn canonical_url(document: &Html) -> Option<String> {
    attr_of_first(document, &CANONICAL_SELECTOR, "href")
}

pub fn robots_meta(document: &Html) -> Option<String> {
    attr_of_first(document, &META_ROBOTS_SELECTOR, "content")
}

pub fn has_structured_data(document: &Html) -> bool {
    document.select(&SCHEMA_SELECTOR).next().is_some()
}

pub fn has_breadcrumbs(document: &Html) -> bool {
    document.select(&BREADCRUMB_SELECTOR).next().is_some()
}

fn attr_of_first(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: &str = r#"<html><head>
        <meta charset="utf-8">
        <title>  Learning Rust Fast </title>
        <meta name="description" content="Intro">
        <meta name="robots" content="noindex, follow">
        <meta property="og:title" content="Learning Rust">
        <meta property="og:image" content="https://example.com/a.png">
        <meta name="twitter:card" content="summary">
        <link rel="canonical" href="https://example.com/canonical">
        <script type="application/ld+json">{"@type": "Article"}</script>
    </head><body></body></html>"#;

    #[test]
    fn head_signals() {
        let document = Html::parse_document(HEAD);
        assert_eq!(title(&document), "Learning Rust Fast");
        assert_eq!(meta_description(&document).unwrap(), "Intro");
        assert_eq!(robots_meta(&document).as_deref(), Some("noindex, follow"));
        assert_eq!(canonical_url(&document).as_deref(), Some("https://example.com/canonical"));
        assert!(has_structured_data(&document));
        assert!(!has_breadcrumbs(&document));
    }

    #[test]
    fn meta_tags_skip_charset_and_split_by_prefix() {
        let tags = meta_tags(&Html::parse_document(HEAD));
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["description", "robots", "og:title", "og:image", "twitter:card"]);

        let og = tags_with_prefix(&tags, "og:");
        assert_eq!(og.len(), 2);
        assert_eq!(og[0].content.as_deref(), Some("Learning Rust"));

        let twitter = tags_with_prefix(&tags, "twitter:");
        assert_eq!(twitter, vec![MetaTag { name: "twitter:card".into(), content: Some("summary".into()) }]);
    }

    #[test]
    fn missing_tags_use_sentinels() {
        let document = Html::parse_document("<p>bare</p>");
        assert_eq!(title(&document), NO_TITLE);
        assert_eq!(meta_description(&document).unwrap(), NO_META_DESCRIPTION);
        assert_eq!(canonical_url(&document), None);
        assert_eq!(robots_meta(&document), None);
        assert!(meta_tags(&document).is_empty());
    }

    #[test]
    fn empty_title_uses_sentinel() {
        assert_eq!(title(&Html::parse_document("<title>   </title>")), NO_TITLE);
    }

    #[test]
    fn description_without_content_is_an_error() {
        let err = meta_description(&Html::parse_document(r#"<meta name="description">"#)).unwrap_err();
        assert!(matches!(err, AppError::AnalysisError(_)));
    }

    #[test]
    fn title_keyword_position_is_one_based() {
        let analysis = analyze_title("Learning Rust Fast", "rust");
        assert_eq!(analysis, TitleAnalysis { length: 18, contains_keyword: true, keyword_position: 10 });

        let missing = analyze_title("Learning Go", "rust");
        assert!(!missing.contains_keyword);
        assert_eq!(missing.keyword_position, 0);
    }

    #[test]
    fn sentinel_title_is_not_analyzed() {
        let analysis = analyze_title(NO_TITLE, "title");
        assert_eq!(analysis.length, 0);
        assert!(!analysis.contains_keyword);
    }

    #[test]
    fn breadcrumb_markup_is_detected() {
        for html in [
            r#"<ol class="breadcrumb"><li>Home</li></ol>"#,
            r#"<div class="breadcrumbs">Home</div>"#,
            r#"<ol itemtype="https://schema.org/BreadcrumbList"></ol>"#,
            r#"<nav aria-label="Breadcrumb"><a href="/">Home</a></nav>"#,
        ] {
            assert!(has_breadcrumbs(&Html::parse_document(html)), "{}", html);
        }
    }
}
