//! Body content signals: paragraphs, sentence variety, introduction and images.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::metrics::{contains_keyword, mean_and_variance, round2, sentence_lengths, word_count};

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

static INTRODUCTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".introduction, #intro").expect("Failed to parse introduction selector")
});

static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img").expect("Failed to parse image selector")
});

const WEB_OPTIMIZED_FORMATS: &[&str] = &["webp", "avif", "svg"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentAnalysis {
    pub paragraph_count: usize,
    /// Mean words per non-empty `<p>`.
    pub average_paragraph_length: f64,
    pub average_sentence_length: f64,
    pub sentence_length_variance: f64,
    /// Body text characters as a percentage of the serialized document.
    pub content_to_html_ratio: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImageSummary {
    pub total: usize,
    pub with_alt: usize,
    pub without_alt: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub src: String,
    pub alt: String,
    pub has_alt: bool,
    pub width: Option<String>,
    pub height: Option<String>,
    pub format: String,
    pub web_optimized: bool,
}

fn paragraphs(document: &Html) -> Vec<String> {
    document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Paragraph shape of the page plus sentence variety of `main_text`.
pub fn analyze_content(document: &Html, main_text: &str) -> ContentAnalysis {
    let paragraph_lengths: Vec<usize> = paragraphs(document).iter().map(|p| word_count(p)).collect();
    let (average_paragraph_length, _) = mean_and_variance(&paragraph_lengths);
    let (average_sentence_length, sentence_length_variance) = mean_and_variance(&sentence_lengths(main_text));

    let html_len = document.html().chars().count();
    let text_len: usize = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| body.text().collect::<String>().trim().chars().count())
        .unwrap_or(0);
    let content_to_html_ratio = if html_len == 0 {
        0.0
    } else {
        round2(text_len as f64 / html_len as f64 * 100.0)
    };

    ContentAnalysis {
        paragraph_count: paragraph_lengths.len(),
        average_paragraph_length,
        average_sentence_length,
        sentence_length_variance,
        content_to_html_ratio,
    }
}

/// Whether the opening paragraph, or an element marked as the introduction, mentions the keyword.
pub fn keyword_in_introduction(document: &Html, keyword: &str) -> bool {
    let first_paragraph = document
        .select(&PARAGRAPH_SELECTOR)
        .next()
        .map(|p| p.text().collect::<String>());

    first_paragraph
        .into_iter()
        .chain(document.select(&INTRODUCTION_SELECTOR).map(|e| e.text().collect::<String>()))
        .any(|text| contains_keyword(&text, keyword))
}

pub fn images(document: &Html) -> Vec<ImageInfo> {
    document
        .select(&IMAGE_SELECTOR)
        .map(|img| {
            let element = img.value();
            let src = element.attr("src").unwrap_or_default().to_string();
            let alt = element.attr("alt").unwrap_or_default().to_string();
            let format = image_format(&src);
            ImageInfo {
                has_alt: !alt.trim().is_empty(),
                width: element.attr("width").map(str::to_string),
                height: element.attr("height").map(str::to_string),
                web_optimized: WEB_OPTIMIZED_FORMATS.contains(&format.as_str()),
                format,
                src,
                alt,
            }
        })
        .collect()
}

pub fn image_summary(images: &[ImageInfo]) -> ImageSummary {
    let with_alt = images.iter().filter(|image| image.has_alt).count();
    ImageSummary {
        total: images.len(),
        with_alt,
        without_alt: images.len() - with_alt,
    }
}

/// Lowercased file extension of an image source, ignoring query and fragment.
fn image_format(src: &str) -> String {
    let path = src.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    match file.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}
