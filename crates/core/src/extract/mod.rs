//! Extraction strategies and their registry.
//!
//! An [`Extractor`] pairs a `can_handle` predicate with an `extract`
//! procedure. The [`ExtractorRegistry`] asks its extractors in registration
//! order and hands the document to the first one that accepts it, falling
//! back to a designated catch-all extractor when none does.
//!
//! The registry is built once by the caller (see
//! [`default_registry`](crate::pipeline::default_registry)) and only read
//! during extraction.
//!
//! # Example
//!
//! ```rust
//! use alchemize_core::extract::{ExtractorRegistry, GenericExtractor};
//! use alchemize_core::parse::Document;
//!
//! let mut registry = ExtractorRegistry::new();
//! registry.set_fallback(GenericExtractor::default());
//!
//! let doc = Document::parse("<html><body><p>Hello</p></body></html>").unwrap();
//! let extractor = registry.find_extractor("https://example.com", &doc).unwrap();
//! assert_eq!(extractor.name(), "generic");
//! ```

pub mod generic;
pub mod skill_builder;

pub use generic::GenericExtractor;
pub use skill_builder::SkillBuilderExtractor;

use scraper::ElementRef;

use crate::content::{ExportMode, ExtractedContent};
use crate::convert::{ConvertOptions, Converter};
use crate::parse::Document;
use crate::postprocess::{PostprocessConfig, postprocess_markdown};
use crate::preprocess::strip_page_chrome;
use crate::scoring::ScoreConfig;
use crate::{AlchemizeError, Result};

/// A named extraction strategy.
pub trait Extractor: Send + Sync {
    /// Identifier used in logs and metadata.
    fn name(&self) -> &str;

    /// Whether this extractor wants the document.
    ///
    /// An `Err` is treated by the registry as "no".
    fn can_handle(&self, url: &str, doc: &Document) -> Result<bool>;

    /// Produce the content record for `doc`.
    fn extract(&self, doc: &Document, url: Option<&str>) -> Result<ExtractedContent>;
}

/// Settings shared by the built-in extractors
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub export_mode: ExportMode,
    /// Whether to add tags detected from the content
    pub auto_tagging: bool,
    pub convert: ConvertOptions,
    pub postprocess: PostprocessConfig,
    /// Main content detection used by the generic extractor
    pub scoring: ScoreConfig,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            export_mode: ExportMode::Reference,
            auto_tagging: true,
            convert: ConvertOptions::default(),
            postprocess: PostprocessConfig::default(),
            scoring: ScoreConfig::default(),
        }
    }
}

impl ExtractOptions {
    pub fn with_mode(export_mode: ExportMode) -> Self {
        Self { export_mode, ..Self::default() }
    }
}

/// Ordered list of extractors plus an optional fallback.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
    fallback: Option<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extractor; earlier registrations are asked first.
    pub fn register<E: Extractor + 'static>(&mut self, extractor: E) {
        tracing::info!(extractor = extractor.name(), "registered extractor");
        self.extractors.push(Box::new(extractor));
    }

    /// Set the extractor used when no registered one accepts a document.
    pub fn set_fallback<E: Extractor + 'static>(&mut self, extractor: E) {
        self.fallback = Some(Box::new(extractor));
    }

    /// Pick the extractor for a document.
    ///
    /// Returns the first registered extractor whose `can_handle` is
    /// `Ok(true)`, else the fallback.
    ///
    /// # Errors
    ///
    /// [`AlchemizeError::NoExtractorAvailable`] when nothing matches and no
    /// fallback is set.
    pub fn find_extractor(&self, url: &str, doc: &Document) -> Result<&dyn Extractor> {
        for extractor in &self.extractors {
            match extractor.can_handle(url, doc) {
                Ok(true) => {
                    tracing::info!(extractor = extractor.name(), "selected extractor");
                    return Ok(extractor.as_ref());
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(extractor = extractor.name(), %err, "extractor failed to inspect document");
                }
            }
        }

        match &self.fallback {
            Some(fallback) => {
                tracing::info!(extractor = fallback.name(), "selected fallback extractor");
                Ok(fallback.as_ref())
            }
            None => Err(AlchemizeError::NoExtractorAvailable),
        }
    }

    /// Registered extractors in consultation order, fallback excluded.
    pub fn extractors(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(|e| e.as_ref())
    }

    pub fn fallback(&self) -> Option<&dyn Extractor> {
        self.fallback.as_deref()
    }

    /// Number of registered extractors, fallback excluded.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Remove every extractor and the fallback.
    pub fn clear(&mut self) {
        self.extractors.clear();
        self.fallback = None;
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.extractors().map(|e| e.name()).collect::<Vec<_>>())
            .field("fallback", &self.fallback().map(|e| e.name()))
            .finish()
    }
}

/// Reparse `doc` with page chrome (navigation, ads, banners) removed.
pub(crate) fn without_chrome(doc: &Document) -> Result<Document> {
    Document::parse(&strip_page_chrome(&doc.as_string()))
}

/// Render an element and run the Markdown postprocessor over the result.
pub(crate) fn render_markdown(converter: &Converter, element: ElementRef<'_>, config: &PostprocessConfig) -> String {
    let markdown = converter.render(element);
    tracing::debug!(element = element.value().name(), markdown_len = markdown.len(), "rendered element");
    postprocess_markdown(&markdown, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        name: &'static str,
        answer: Result<bool>,
    }

    impl Fixed {
        fn new(name: &'static str, answer: bool) -> Self {
            Self { name, answer: Ok(answer) }
        }

        fn failing(name: &'static str) -> Self {
            Self { name, answer: Err(AlchemizeError::HtmlParseError("broken predicate".to_string())) }
        }
    }

    impl Extractor for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn can_handle(&self, _url: &str, _doc: &Document) -> Result<bool> {
            match &self.answer {
                Ok(answer) => Ok(*answer),
                Err(err) => Err(AlchemizeError::HtmlParseError(err.to_string())),
            }
        }

        fn extract(&self, _doc: &Document, _url: Option<&str>) -> Result<ExtractedContent> {
            Ok(ExtractedContent::new(self.name))
        }
    }

    fn doc() -> Document {
        Document::parse("<html><body><p>x</p></body></html>").unwrap()
    }

    #[test]
    fn test_first_matching_extractor_wins() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Fixed::new("a", false));
        registry.register(Fixed::new("b", true));
        registry.register(Fixed::new("c", true));
        registry.set_fallback(Fixed::new("f", true));

        assert_eq!(registry.find_extractor("", &doc()).unwrap().name(), "b");
    }

    #[test]
    fn test_fallback_when_none_match() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Fixed::new("a", false));
        registry.register(Fixed::new("b", false));
        registry.set_fallback(Fixed::new("f", false));

        assert_eq!(registry.find_extractor("", &doc()).unwrap().name(), "f");
    }

    #[test]
    fn test_no_extractor_available() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Fixed::new("a", false));
        registry.register(Fixed::new("b", false));

        let result = registry.find_extractor("", &doc());
        assert!(matches!(result, Err(AlchemizeError::NoExtractorAvailable)));
    }

    #[test]
    fn test_failing_predicate_is_skipped() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Fixed::failing("broken"));
        registry.register(Fixed::new("b", true));

        assert_eq!(registry.find_extractor("", &doc()).unwrap().name(), "b");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Fixed::new("a", true));
        registry.register(Fixed::new("b", true));
        let doc = doc();

        let picks: Vec<&str> = (0..5).map(|_| registry.find_extractor("", &doc).unwrap().name()).collect();
        assert!(picks.iter().all(|name| *name == "a"));
    }

    #[test]
    fn test_clear() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Fixed::new("a", true));
        registry.set_fallback(Fixed::new("f", true));
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.fallback().is_none());
        assert!(matches!(registry.find_extractor("", &doc()), Err(AlchemizeError::NoExtractorAvailable)));
    }
}
