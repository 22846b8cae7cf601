//! Heading structure: per-level keyword coverage and level jumps.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::metrics::{contains_keyword, round2};

static ALL_HEADINGS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("Failed to parse heading selector")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingLevel {
    pub count: usize,
    pub with_keyword: usize,
    pub average_length: f64,
    pub list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingAnalysis {
    pub h1: HeadingLevel,
    pub h2: HeadingLevel,
    pub h3: HeadingLevel,
}

impl HeadingAnalysis {
    /// h1, h2 and h3 elements whose text contains the keyword.
    pub fn with_keyword(&self) -> usize {
        self.h1.with_keyword + self.h2.with_keyword + self.h3.with_keyword
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingEntry {
    pub tag: String,
    pub text: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyIssue {
    pub message: String,
    pub position: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingHierarchy {
    pub headings: Vec<HeadingEntry>,
    pub hierarchy_issues: Vec<HierarchyIssue>,
}

/// All h1-h6 headings in document order.
pub fn headings(document: &Html) -> Vec<HeadingEntry> {
    document
        .select(&ALL_HEADINGS_SELECTOR)
        .enumerate()
        .map(|(position, element)| HeadingEntry {
            tag: element.value().name().to_string(),
            text: element.text().collect(),
            position,
        })
        .collect()
}

pub fn analyze_headings(headings: &[HeadingEntry], keyword: &str) -> HeadingAnalysis {
    HeadingAnalysis {
        h1: level(headings, "h1", keyword),
        h2: level(headings, "h2", keyword),
        h3: level(headings, "h3", keyword),
    }
}

fn level(headings: &[HeadingEntry], tag: &str, keyword: &str) -> HeadingLevel {
    let list: Vec<String> = headings
        .iter()
        .filter(|heading| heading.tag == tag)
        .map(|heading| heading.text.clone())
        .collect();

    let total_chars: usize = list.iter().map(|text| text.chars().count()).sum();
    let average_length = if list.is_empty() {
        0.0
    } else {
        round2(total_chars as f64 / list.len() as f64)
    };

    HeadingLevel {
        count: list.len(),
        with_keyword: list.iter().filter(|text| contains_keyword(text, keyword)).count(),
        average_length,
        list,
    }
}

/// Flags headings that go more than one level deeper than the heading before them.
pub fn heading_hierarchy(headings: Vec<HeadingEntry>) -> HeadingHierarchy {
    let mut hierarchy_issues = Vec::new();
    let mut last: Option<&HeadingEntry> = None;

    for heading in &headings {
        let current = heading_level(&heading.tag);
        let previous = last.map_or(0, |h| heading_level(&h.tag));

        if current > previous + 1 {
            let from = last.map_or_else(
                || "the start of the document".to_string(),
                |h| format!("<{}>", h.tag.to_uppercase()),
            );
            hierarchy_issues.push(HierarchyIssue {
                message: format!(
                    "Improper jump in heading levels from {} to <{}>",
                    from,
                    heading.tag.to_uppercase()
                ),
                position: heading.position,
                text: heading.text.clone(),
            });
        }
        last = Some(heading);
    }

    HeadingHierarchy {
        hierarchy_issues,
        headings,
    }
}

fn heading_level(tag: &str) -> u8 {
    tag.strip_prefix('h')
        .and_then(|level| level.parse().ok())
        .unwrap_or(0)
}
