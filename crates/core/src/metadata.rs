//! Metadata helpers shared by every extractor.
//!
//! Authors and dates come from ordered selector fallback lists on the
//! [`Document`]. Images, diagram detection, tagging and word counts are free
//! functions so each extractor can apply its own inputs (container element,
//! keyword lists) without inheriting any behavior.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use scraper::ElementRef;

use crate::content::ImageAsset;
use crate::parse::Document;

/// Maximum number of tags [`auto_tag`] returns.
pub const MAX_AUTO_TAGS: usize = 10;

/// URL/alt keywords that mark an image as a diagram.
pub const DIAGRAM_KEYWORDS: &[&str] = &["diagram", "architecture", "flowchart", "schema", "diagrama", "arquitectura"];

const AUTHOR_SELECTORS: &[&str] =
    &["meta[name=\"author\"]", "meta[property=\"article:author\"]", ".author", "[rel=\"author\"]", ".byline"];

const DATE_SELECTORS: &[&str] = &[
    "meta[property=\"article:published_time\"]",
    "meta[name=\"publishedDate\"]",
    "time[datetime]",
    ".published",
    ".date",
];

/// Technical terms recognised by [`auto_tag`], in reporting order.
pub const TAG_VOCABULARY: &[&str] = &[
    "React", "Vue", "Angular", "Svelte", "Next.js", "Nuxt",
    "Python", "JavaScript", "TypeScript", "Go", "Rust", "Java", "C#", "PHP",
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform",
    "API", "GraphQL", "REST", "gRPC", "WebSocket",
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch",
    "Linux", "Ubuntu", "Debian", "CentOS",
    "Git", "GitHub", "GitLab", "CI/CD", "DevOps",
    "HTML", "CSS", "SCSS", "Tailwind", "Bootstrap",
    "Node.js", "Express", "NestJS", "FastAPI", "Django", "Flask",
    "AI", "Machine Learning", "Deep Learning", "LLM", "NLP",
    "Security", "OAuth", "JWT", "SSL", "HTTPS",
];

static TAG_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TAG_VOCABULARY
        .iter()
        .filter_map(|term| {
            Regex::new(&format!(r"(?i)(?:^|[^\w]){}(?:[^\w]|$)", regex::escape(term)))
                .ok()
                .map(|pattern| (*term, pattern))
        })
        .collect()
});

impl Document {
    /// Title from `<title>`, then the first `<h1>`.
    pub fn extract_title(&self) -> Option<String> {
        self.title().or_else(|| self.first_text(&["h1"]))
    }

    /// Author from meta tags, then byline elements.
    pub fn extract_author(&self) -> Option<String> {
        self.first_attr_or_text(AUTHOR_SELECTORS, &["content"])
    }

    /// Publication date from meta tags, `<time>` and date-classed elements.
    ///
    /// Selectors whose value does not parse as a date are skipped.
    pub fn extract_date(&self) -> Option<DateTime<Utc>> {
        DATE_SELECTORS.iter().find_map(|selector| {
            let value = self.first_attr_or_text(&[selector], &["content", "datetime"])?;
            let parsed = parse_date(&value);
            if parsed.is_none() {
                tracing::debug!(%selector, %value, "ignoring unparseable date");
            }
            parsed
        })
    }
}

/// Parse RFC 3339, RFC 2822 or a bare `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map(|date| date.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
        })
}

/// Collect the images below `container`.
///
/// Sources come from `src`, then `data-src`. The first occurrence of a URL
/// wins; later duplicates are skipped. Missing `alt` text becomes `"image"`.
pub fn extract_images(container: ElementRef<'_>, diagram_keywords: &[&str]) -> Vec<ImageAsset> {
    let mut seen = HashSet::new();

    container
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "img")
        .filter_map(|img| {
            let src = ["src", "data-src"]
                .iter()
                .find_map(|attr| img.value().attr(attr).map(str::trim).filter(|s| !s.is_empty()))?;
            if !seen.insert(src.to_string()) {
                return None;
            }

            let alt = img.value().attr("alt").map(str::trim).filter(|a| !a.is_empty()).unwrap_or("image");
            let width = img.value().attr("width").and_then(|w| w.trim().trim_end_matches("px").parse::<u32>().ok());

            let mut asset = ImageAsset::new(src, alt);
            asset.is_diagram = is_likely_diagram(src, alt, width, diagram_keywords);
            Some(asset)
        })
        .collect()
}

/// Diagram heuristic: a keyword in the URL or alt text, an SVG source, or a
/// declared width above 600 pixels.
pub fn is_likely_diagram(src: &str, alt: &str, width: Option<u32>, keywords: &[&str]) -> bool {
    let src = src.to_lowercase();
    let alt = alt.to_lowercase();

    keywords.iter().any(|kw| src.contains(kw) || alt.contains(kw))
        || src.split(['?', '#']).next().is_some_and(|path| path.ends_with(".svg"))
        || width.is_some_and(|w| w > 600)
}

/// Detect technical terms in `text`.
///
/// Matching is case-insensitive on word boundaries. Results follow
/// [`TAG_VOCABULARY`] order, appear once each and are capped at
/// [`MAX_AUTO_TAGS`].
pub fn auto_tag(text: &str) -> Vec<String> {
    TAG_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(term, _)| term.to_string())
        .take(MAX_AUTO_TAGS)
        .collect()
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
