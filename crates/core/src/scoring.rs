//! Readability-style main content detection.
//!
//! Paragraph-like elements (`p`, `pre`, `td`, `blockquote`) with enough text
//! award points to their parent and, at half weight, their grandparent. Each
//! container starts from a tag score plus a class/id weight, and its final
//! score is scaled down by its link density. The best scoring container wins
//! when it clears [`ScoreConfig::min_score_threshold`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::parse::{Document, element_text};

/// Class/id fragments that suggest main content
static POSITIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)")
        .expect("valid positive pattern")
});

/// Class/id fragments that suggest page furniture
static NEGATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup)",
    )
    .expect("valid negative pattern")
});

static PARAGRAPHS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, pre, td, blockquote").expect("valid paragraph selector"));

static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid link selector"));

/// Configuration for content scoring
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreConfig {
    /// Minimum score the winning container must reach
    pub min_score_threshold: f64,
    /// Paragraphs shorter than this (in characters) award nothing
    pub min_paragraph_len: usize,
    /// Weight for positive class/id patterns
    pub positive_weight: f64,
    /// Weight for negative class/id patterns
    pub negative_weight: f64,
    /// Cap on the points awarded for paragraph length
    pub max_char_density_score: f64,
    /// Cap on the points awarded for commas
    pub max_comma_density_score: f64,
    /// Characters per length point
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            min_score_threshold: 20.0,
            min_paragraph_len: 25,
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
        }
    }
}

/// Starting score of a container, by tag
pub fn base_tag_score(element: ElementRef<'_>) -> f64 {
    match element.value().name() {
        "article" => 10.0,
        "section" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "form" => -3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Weight from the element's id and class names.
///
/// The id is checked before the classes; within each, a positive match wins
/// over a negative one.
pub fn class_id_weight(element: ElementRef<'_>, config: &ScoreConfig) -> f64 {
    let names = element.value().id().into_iter().chain(element.value().classes());

    for name in names {
        if POSITIVE_PATTERN.is_match(name) {
            return config.positive_weight;
        }
        if NEGATIVE_PATTERN.is_match(name) {
            return config.negative_weight;
        }
    }

    0.0
}

/// Points for a paragraph: one for existing, plus capped length and comma points
pub fn paragraph_score(text: &str, config: &ScoreConfig) -> f64 {
    let per_point = config.chars_per_point.max(1);
    let length = ((text.chars().count() / per_point) as f64).min(config.max_char_density_score);
    let commas = (text.matches(',').count() as f64).min(config.max_comma_density_score);

    1.0 + length + commas
}

/// Share of the element's text that sits inside links, from 0.0 to 1.0
pub fn link_density(element: ElementRef<'_>) -> f64 {
    let total = element_text(element).chars().count();
    if total == 0 {
        return 0.0;
    }

    let linked: usize = element.select(&LINKS).map(|link| element_text(link).chars().count()).sum();
    (linked as f64 / total as f64).min(1.0)
}

struct Candidate<'a> {
    element: ElementRef<'a>,
    score: f64,
}

/// Find the element most likely to hold the main content.
///
/// Returns `None` when no container scores high enough, or when the winner
/// is the whole `<body>`/`<html>`; callers fall back to their own selectors.
pub fn find_main_content<'a>(doc: &'a Document, config: &ScoreConfig) -> Option<ElementRef<'a>> {
    let mut candidates: Vec<Candidate<'a>> = Vec::new();
    let mut index = HashMap::new();

    for paragraph in doc.html().select(&PARAGRAPHS) {
        let text = element_text(paragraph);
        if text.chars().count() < config.min_paragraph_len {
            continue;
        }
        let points = paragraph_score(&text, config);

        let ancestors = paragraph.ancestors().filter_map(ElementRef::wrap).take(2);
        for (depth, ancestor) in ancestors.enumerate() {
            let slot = *index.entry(ancestor.id()).or_insert_with(|| {
                candidates.push(Candidate {
                    element: ancestor,
                    score: base_tag_score(ancestor) + class_id_weight(ancestor, config),
                });
                candidates.len() - 1
            });
            candidates[slot].score += if depth == 0 { points } else { points / 2.0 };
        }
    }

    let best = candidates
        .into_iter()
        .map(|candidate| Candidate {
            score: candidate.score * (1.0 - link_density(candidate.element)),
            element: candidate.element,
        })
        .fold(None::<Candidate<'a>>, |best, candidate| match best {
            Some(best) if best.score >= candidate.score => Some(best),
            _ => Some(candidate),
        })?;

    tracing::debug!(element = best.element.value().name(), score = best.score, "top content candidate");

    if best.score < config.min_score_threshold || matches!(best.element.value().name(), "body" | "html") {
        return None;
    }
    Some(best.element)
}
