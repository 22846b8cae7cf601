use serde::Serialize;
use url::Url;

use crate::metrics::contains_keyword;

const MAX_SLUG_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlugAnalysis {
    pub slug: String,
    pub length: usize,
    pub contains_keyword: bool,
    pub is_readable: bool,
    pub has_dashes: bool,
    pub has_underscores: bool,
    pub has_numbers: bool,
    pub recommendation: String,
}

/// Analyzes the last path segment of `url`. Returns `None` when the URL does not parse.
pub fn analyze_slug(url: &str, keyword: &str) -> Option<SlugAnalysis> {
    let parsed = Url::parse(url).ok()?;
    let slug = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default()
        .to_string();

    let contains_keyword = !slug.is_empty() && contains_keyword(&slug, keyword);
    let is_readable = !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    let has_underscores = slug.contains('_');
    let has_numbers = slug.chars().any(|c| c.is_ascii_digit());

    let recommendation = recommend(&slug, contains_keyword, is_readable, has_underscores, has_numbers);

    Some(SlugAnalysis {
        length: slug.chars().count(),
        has_dashes: slug.contains('-'),
        slug,
        contains_keyword,
        is_readable,
        has_underscores,
        has_numbers,
        recommendation,
    })
}

fn recommend(
    slug: &str,
    contains_keyword: bool,
    is_readable: bool,
    has_underscores: bool,
    has_numbers: bool,
) -> String {
    if slug.is_empty() {
        return "Add a descriptive slug to the URL.".to_string();
    }

    let mut advice = Vec::new();
    if slug.chars().count() > MAX_SLUG_CHARS {
        advice.push("Consider shortening the slug.");
    }
    if !contains_keyword {
        advice.push("Include the main keyword in the slug if possible.");
    }
    if has_underscores {
        advice.push("Replace underscores with hyphens for better readability.");
    }
    if !is_readable {
        advice.push("Use only lowercase letters, numbers, and hyphens in the slug.");
    }
    if has_numbers {
        advice.push("Consider removing numbers from the slug unless necessary.");
    }

    if advice.is_empty() {
        "The current slug is well-optimized.".to_string()
    } else {
        advice.join(" ")
    }
}
