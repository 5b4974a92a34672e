//! End-to-end entry points.
//!
//! ```text
//! raw HTML -> preprocess -> parse -> find extractor -> extract -> ExtractedContent
//! Markdown -> import_markdown ---------------------------------> ExtractedContent
//! ```
//!
//! # Example
//!
//! ```rust
//! use alchemize_core::pipeline::{default_registry, extract_html};
//! use alchemize_core::ExportMode;
//!
//! let registry = default_registry(ExportMode::Reference);
//! let html = "<html><head><title>Notes</title></head><body><article><p>Hello</p></article></body></html>";
//! let content = extract_html(html, None, &registry).unwrap();
//!
//! assert_eq!(content.title, "Notes");
//! assert_eq!(content.markdown, "Hello");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::Result;
use crate::content::{ExportMode, ExtractedContent};
use crate::export::apply_export_mode;
use crate::extract::{ExtractOptions, ExtractorRegistry, GenericExtractor, SkillBuilderExtractor};
use crate::metadata::word_count;
use crate::parse::Document;
use crate::preprocess::PreprocessConfig;

const IMPORTED_TITLE: &str = "Imported Note";
const MAX_IMPORT_TAGS: usize = 5;

/// Terms looked for, as plain substrings, in imported Markdown.
const IMPORT_VOCABULARY: &[&str] = &[
    "AWS", "React", "TypeScript", "JavaScript", "Python", "Node.js", "Cloud", "Docker", "Kubernetes", "API",
    "Database", "Security",
];

static H1_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+)$").expect("valid h1 pattern"));
static H2_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##[ \t]+(.+)$").expect("valid h2 pattern"));

/// What a piece of input text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A single `http`/`https` URL.
    Url,
    Html,
    /// Markdown, or plain text treated as Markdown.
    Markdown,
}

impl ContentKind {
    /// Classify `text`.
    ///
    /// A URL must parse and use `http` or `https`. HTML is recognised by a
    /// doctype, an `<html` tag, or any opening/closing tag pair. Everything
    /// else is Markdown.
    pub fn detect(text: &str) -> Self {
        let trimmed = text.trim();

        if is_web_url(trimmed) {
            return Self::Url;
        }

        let lowered = trimmed.to_lowercase();
        if lowered.contains("<!doctype") || lowered.contains("<html") || (trimmed.contains("</") && trimmed.contains('>'))
        {
            return Self::Html;
        }

        Self::Markdown
    }
}

fn is_web_url(text: &str) -> bool {
    !text.contains(char::is_whitespace)
        && Url::parse(text).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Registry with the course-platform extractor and the generic fallback.
pub fn default_registry(export_mode: ExportMode) -> ExtractorRegistry {
    registry_with_options(&ExtractOptions::with_mode(export_mode))
}

/// [`default_registry`] with full control over the extractor options.
pub fn registry_with_options(options: &ExtractOptions) -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();
    registry.register(SkillBuilderExtractor::new(options.clone()));
    registry.set_fallback(GenericExtractor::new(options.clone()));
    registry
}

/// Run the full HTML pipeline with the default preprocessing passes.
pub fn extract_html(html: &str, url: Option<&str>, registry: &ExtractorRegistry) -> Result<ExtractedContent> {
    extract_html_with_config(html, url, registry, &PreprocessConfig::default())
}

/// Preprocess, parse, pick an extractor and extract.
///
/// # Errors
///
/// [`AlchemizeError::NoExtractorAvailable`](crate::AlchemizeError::NoExtractorAvailable)
/// when the registry has no matching extractor and no fallback.
pub fn extract_html_with_config(
    html: &str, url: Option<&str>, registry: &ExtractorRegistry, config: &PreprocessConfig,
) -> Result<ExtractedContent> {
    let base_url = url.and_then(|url| Url::parse(url).ok()).filter(|url| matches!(url.scheme(), "http" | "https"));
    let with_base;
    let config = match (&config.base_url, base_url) {
        (None, Some(base_url)) => {
            with_base = PreprocessConfig { base_url: Some(base_url), ..config.clone() };
            &with_base
        }
        _ => config,
    };

    let doc = Document::parse_with_preprocessing(html, config)?;
    tracing::debug!(input_len = html.len(), "preprocessed and parsed document");

    let extractor = registry.find_extractor(url.unwrap_or_default(), &doc)?;
    extractor.extract(&doc, url)
}

/// Wrap existing Markdown in a content record.
///
/// The title is the first `#` heading, then the first `##` heading, then
/// `"Imported Note"`. The body is laid out for the export mode but
/// otherwise kept as written.
pub fn import_markdown(markdown: &str, options: &ExtractOptions) -> ExtractedContent {
    let title = [&*H1_LINE, &*H2_LINE]
        .iter()
        .find_map(|pattern| pattern.captures(markdown).map(|captures| captures[1].trim().to_string()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| IMPORTED_TITLE.to_string());

    let mut content = ExtractedContent::new(title);
    if options.auto_tagging {
        content.add_tags(import_tags(markdown));
    }
    content.set_metadata("extractor", "markdown-import");
    content.set_metadata("exportMode", options.export_mode);
    content.set_metadata("wordCount", word_count(markdown));
    content.markdown = apply_export_mode(markdown.trim(), options.export_mode);

    tracing::debug!(title = %content.title, "imported markdown");
    content
}

fn import_tags(markdown: &str) -> Vec<&'static str> {
    let lowered = markdown.to_lowercase();
    IMPORT_VOCABULARY
        .iter()
        .filter(|term| lowered.contains(&term.to_lowercase()))
        .copied()
        .take(MAX_IMPORT_TAGS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlchemizeError;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/page", ContentKind::Url)]
    #[case("  http://example.com  ", ContentKind::Url)]
    #[case("ftp://example.com/file", ContentKind::Markdown)]
    #[case("<!DOCTYPE html><html><body>x</body></html>", ContentKind::Html)]
    #[case("<div>fragment</div>", ContentKind::Html)]
    #[case("# Title\n\nSome *text*", ContentKind::Markdown)]
    #[case("plain words only", ContentKind::Markdown)]
    #[case("https://example.com and more words", ContentKind::Markdown)]
    fn test_detect(#[case] input: &str, #[case] expected: ContentKind) {
        assert_eq!(ContentKind::detect(input), expected);
    }

    #[test]
    fn test_default_registry() {
        let registry = default_registry(ExportMode::Study);

        assert_eq!(registry.extractors().map(|e| e.name()).collect::<Vec<_>>(), vec!["aws-skill-builder"]);
        assert_eq!(registry.fallback().map(|e| e.name()), Some("generic"));
    }

    #[test]
    fn test_extract_html_routes_to_course_extractor() {
        let html = r#"<html><body><div class="course-content"><h2>Lesson</h2><p>Body</p></div></body></html>"#;
        let content = extract_html(html, Some("https://example.com"), &default_registry(ExportMode::Reference)).unwrap();

        assert_eq!(content.metadata_text("extractor"), Some("aws-skill-builder"));
    }

    #[test]
    fn test_extract_html_resolves_relative_urls() {
        let html = r#"<html><body><article><p>See <a href="/guide">the guide</a>.</p><img src="img/flow-diagram.png" alt="Flow"></article></body></html>"#;
        let registry = default_registry(ExportMode::Reference);

        let content = extract_html(html, Some("https://docs.example.com/start/"), &registry).unwrap();
        assert!(content.markdown.contains("[the guide](https://docs.example.com/guide)"));
        assert_eq!(content.images[0].original_url, "https://docs.example.com/start/img/flow-diagram.png");

        let local = extract_html(html, None, &registry).unwrap();
        assert_eq!(local.images[0].original_url, "img/flow-diagram.png");
    }

    #[test]
    fn test_extract_html_without_fallback() {
        let registry = ExtractorRegistry::new();
        let result = extract_html("<p>x</p>", None, &registry);

        assert!(matches!(result, Err(AlchemizeError::NoExtractorAvailable)));
    }

    #[test]
    fn test_import_markdown() {
        let markdown = "Intro line\n\n## Deploying on AWS\n\nUse Docker with the API.\n\n# Real Title";
        let content = import_markdown(markdown, &ExtractOptions::default());

        assert_eq!(content.title, "Real Title");
        assert_eq!(content.tags, vec!["AWS", "Docker", "API"]);
        assert_eq!(content.metadata_text("extractor"), Some("markdown-import"));
        assert_eq!(content.metadata_text("exportMode"), Some("reference"));
        assert_eq!(content.markdown, markdown);
    }

    #[test]
    fn test_import_markdown_title_fallbacks() {
        let options = ExtractOptions::default();

        assert_eq!(import_markdown("## Section\n\ntext", &options).title, "Section");
        assert_eq!(import_markdown("no headings", &options).title, IMPORTED_TITLE);
        assert_eq!(import_markdown("#hashtag only", &options).title, IMPORTED_TITLE);
        assert_eq!(import_markdown("#\nnot a heading", &options).title, IMPORTED_TITLE);
        assert_eq!(import_markdown("#\n## Next Line", &options).title, "Next Line");
    }

    #[test]
    fn test_import_tags_capped() {
        let text = "aws react typescript javascript python node.js cloud docker";
        let options = ExtractOptions::default();

        assert_eq!(import_markdown(text, &options).tags.len(), MAX_IMPORT_TAGS);
        let no_tags = ExtractOptions { auto_tagging: false, ..Default::default() };
        assert!(import_markdown(text, &no_tags).tags.is_empty());
    }

    #[test]
    fn test_import_markdown_study_mode() {
        let content = import_markdown("# T\n\nA paragraph.", &ExtractOptions::with_mode(ExportMode::Study));

        assert!(content.markdown.starts_with("## Summary\n\nA paragraph."));
    }
}
