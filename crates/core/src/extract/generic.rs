//! Catch-all extractor for arbitrary web pages.

use super::{ExtractOptions, Extractor, render_markdown, without_chrome};
use crate::Result;
use crate::content::{ExportMode, ExtractedContent};
use crate::convert::Converter;
use crate::export::apply_export_mode;
use crate::metadata::{DIAGRAM_KEYWORDS, auto_tag, extract_images, word_count};
use crate::parse::Document;
use crate::postprocess::postprocess_markdown;
use crate::scoring::find_main_content;

/// Main content candidates when scoring finds no winner, most specific first.
const MAIN_CONTENT_SELECTORS: &[&str] = &["article", "main", "[role=\"main\"]", ".content", "body"];

const UNTITLED: &str = "Untitled";

/// Extractor that accepts every document.
///
/// Usually installed as the registry fallback.
#[derive(Debug, Clone, Default)]
pub struct GenericExtractor {
    options: ExtractOptions,
}

impl GenericExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn with_mode(export_mode: ExportMode) -> Self {
        Self::new(ExtractOptions::with_mode(export_mode))
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }
}

impl Extractor for GenericExtractor {
    fn name(&self) -> &str {
        "generic"
    }

    fn can_handle(&self, _url: &str, _doc: &Document) -> Result<bool> {
        Ok(true)
    }

    fn extract(&self, doc: &Document, url: Option<&str>) -> Result<ExtractedContent> {
        let clean = without_chrome(doc)?;
        let main = find_main_content(&clean, &self.options.scoring)
            .or_else(|| clean.first_match(MAIN_CONTENT_SELECTORS))
            .unwrap_or_else(|| clean.body());

        let converter = Converter::builder().options(self.options.convert.clone()).build();
        let markdown = render_markdown(&converter, main, &self.options.postprocess);

        let mut content = ExtractedContent::new(clean.extract_title().unwrap_or_else(|| UNTITLED.to_string()));
        content.author = clean.extract_author();
        content.date = clean.extract_date();
        content.source_url = url.map(str::to_string);
        if self.options.auto_tagging {
            content.add_tags(auto_tag(&markdown));
        }
        content.images = extract_images(clean.body(), DIAGRAM_KEYWORDS);

        content.set_metadata("extractor", self.name());
        content.set_metadata("exportMode", self.options.export_mode);
        content.set_metadata("wordCount", word_count(&markdown));

        let laid_out = apply_export_mode(&markdown, self.options.export_mode);
        content.markdown = postprocess_markdown(&laid_out, &self.options.postprocess);

        tracing::debug!(title = %content.title, images = content.images.len(), "extracted generic content");
        Ok(content)
    }
}
