//! Extractor for AWS Skill Builder course pages.
//!
//! Course pages carry a course title, an optional module title, learning
//! objectives and an estimated duration. Each is read through an ordered
//! selector fallback list. Architecture diagrams are collected into their
//! own section of the note.

use scraper::ElementRef;

use super::{ExtractOptions, Extractor, render_markdown, without_chrome};
use crate::Result;
use crate::content::{ExportMode, ExtractedContent, ImageAsset};
use crate::convert::Converter;
use crate::convert::rules::{CalloutKind, callout_rule, code_container_rule, has_class};
use crate::export::{STUDY_NOTES_TEMPLATE, flashcards_layout};
use crate::metadata::{DIAGRAM_KEYWORDS, auto_tag, extract_images, word_count};
use crate::parse::Document;
use crate::postprocess::postprocess_markdown;

const URL_MARKERS: &[&str] = &["skillbuilder.aws"];

const COURSE_INDICATORS: &[&str] = &[
    "[data-testid=\"course-content\"]",
    ".course-content",
    "[class*=\"aws-skill-builder\"]",
    ".module-content",
    ".learning-content",
];

const COURSE_TITLE_SELECTORS: &[&str] =
    &["h1.course-title", "[data-testid=\"course-title\"]", ".course-header h1", "h1"];

const MODULE_TITLE_SELECTORS: &[&str] =
    &[".module-title", "[data-testid=\"module-title\"]", ".current-module h2", ".content-header h2"];

const OBJECTIVE_SELECTORS: &[&str] = &[
    ".learning-objectives li",
    "[data-testid=\"learning-objective\"]",
    ".objectives-list li",
    ".learning-outcomes li",
];

const ESTIMATED_TIME_SELECTORS: &[&str] =
    &[".estimated-time", "[data-testid=\"duration\"]", ".duration", "time[datetime]"];

const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "[data-testid=\"course-content\"]",
    ".course-content",
    ".module-content",
    ".learning-content",
    "article",
    "main",
    ".content",
];

const ARCHITECTURE_KEYWORDS: &[&str] = &[
    "architecture", "diagram", "diagrama", "arquitectura", "schema", "infrastructure", "infraestructura", "vpc",
    "subnet", "ec2", "s3", "rds", "lambda", "flow", "workflow", "data-flow",
];

const DEFAULT_COURSE_TITLE: &str = "AWS Course";
const DIAGRAM_ALT_TEXT: &str = "AWS Architecture Diagram";
const PLATFORM: &str = "aws-skill-builder";
const BASE_TAGS: &[&str] = &["aws", "cloud", "certification"];

/// Course details read from the page.
#[derive(Debug, Clone, Default, PartialEq)]
struct CourseInfo {
    course: String,
    module: Option<String>,
    objectives: Vec<String>,
    estimated_time: Option<String>,
}

impl CourseInfo {
    fn from_document(doc: &Document) -> Self {
        Self {
            course: doc
                .first_text(COURSE_TITLE_SELECTORS)
                .or_else(|| doc.title())
                .unwrap_or_else(|| DEFAULT_COURSE_TITLE.to_string()),
            module: doc.first_text(MODULE_TITLE_SELECTORS),
            objectives: doc.first_text_list(OBJECTIVE_SELECTORS),
            estimated_time: doc.first_text(ESTIMATED_TIME_SELECTORS),
        }
    }

    fn title(&self) -> String {
        match &self.module {
            Some(module) => format!("{} - {}", self.course, module),
            None => self.course.clone(),
        }
    }
}

/// Extractor for AWS Skill Builder courses.
#[derive(Debug, Clone, Default)]
pub struct SkillBuilderExtractor {
    options: ExtractOptions,
}

impl SkillBuilderExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn with_mode(export_mode: ExportMode) -> Self {
        Self::new(ExtractOptions::with_mode(export_mode))
    }

    /// Converter with the course-specific code and note rules ahead of the baseline.
    fn converter(&self) -> Converter {
        Converter::builder()
            .options(self.options.convert.clone())
            .rule(code_container_rule("course-code", |el: ElementRef<'_>| {
                el.value().name() == "pre" || has_class(el, "code-block") || has_class(el, "highlight")
            }))
            .rule(callout_rule("course-note", is_course_note, classify_course_note))
            .build()
    }

    fn layout(&self, info: &CourseInfo, markdown: &str, images: &[ImageAsset]) -> String {
        let mut lines: Vec<String> = Vec::new();

        if !info.objectives.is_empty() {
            lines.push("## Learning Objectives".to_string());
            lines.push(String::new());
            lines.extend(info.objectives.iter().map(|objective| format!("- [ ] {objective}")));
            lines.push(String::new());
            lines.push("---".to_string());
            lines.push(String::new());
        }

        lines.push("## Content".to_string());
        lines.push(String::new());
        lines.push(markdown.to_string());
        lines.push(String::new());

        let diagrams: Vec<&ImageAsset> = images.iter().filter(|image| image.is_diagram).collect();
        if !diagrams.is_empty() {
            lines.push("---".to_string());
            lines.push(String::new());
            lines.push("## Architecture Diagrams".to_string());
            lines.push(String::new());
            for (index, image) in diagrams.iter().enumerate() {
                let target = image.local_path.as_deref().unwrap_or(&image.original_url);
                lines.push(format!("### Diagram {}: {}", index + 1, image.alt_text));
                lines.push(String::new());
                lines.push(format!("![{}]({})", image.alt_text, target));
                lines.push(String::new());
            }
        }

        let body = lines.join("\n");
        match self.options.export_mode {
            ExportMode::Reference => body,
            ExportMode::Study => format!("{body}\n---\n\n{STUDY_NOTES_TEMPLATE}"),
            ExportMode::Flashcards => flashcards_layout(&body),
        }
    }
}

impl Extractor for SkillBuilderExtractor {
    fn name(&self) -> &str {
        "aws-skill-builder"
    }

    fn can_handle(&self, url: &str, doc: &Document) -> Result<bool> {
        Ok(URL_MARKERS.iter().any(|marker| url.contains(marker)) || doc.matches_any(COURSE_INDICATORS))
    }

    fn extract(&self, doc: &Document, url: Option<&str>) -> Result<ExtractedContent> {
        let clean = without_chrome(doc)?;
        let info = CourseInfo::from_document(&clean);

        let main = clean.first_match(MAIN_CONTENT_SELECTORS).unwrap_or_else(|| clean.body());
        let markdown = render_markdown(&self.converter(), main, &self.options.postprocess);

        let mut images = extract_images(main, DIAGRAM_KEYWORDS);
        for image in &mut images {
            mark_architecture_diagram(image);
        }

        let mut content = ExtractedContent::new(info.title());
        content.source_url = url.map(str::to_string);
        content.add_tags(BASE_TAGS.iter().copied());
        if self.options.auto_tagging {
            content.add_tags(auto_tag(&markdown));
        }

        content.set_metadata("extractor", self.name());
        content.set_metadata("platform", PLATFORM);
        content.set_metadata("course", info.course.as_str());
        if let Some(module) = &info.module {
            content.set_metadata("module", module.as_str());
        }
        content.set_metadata("objectives", info.objectives.clone());
        if let Some(time) = &info.estimated_time {
            content.set_metadata("estimatedTime", time.as_str());
        }
        content.set_metadata("wordCount", word_count(&markdown));
        content.set_metadata("exportMode", self.options.export_mode);

        let laid_out = self.layout(&info, &markdown, &images);
        content.markdown = postprocess_markdown(&laid_out, &self.options.postprocess);
        content.images = images;

        tracing::debug!(course = %info.course, module = ?info.module, "extracted course content");
        Ok(content)
    }
}

fn is_course_note(element: ElementRef<'_>) -> bool {
    has_class(element, "aws-note") || has_class(element, "alert") || element.value().attr("role") == Some("note")
}

fn classify_course_note(element: ElementRef<'_>) -> CalloutKind {
    let any = |classes: &[&str]| classes.iter().any(|class| has_class(element, class));

    if any(&["warning", "alert-warning"]) {
        CalloutKind::Warning
    } else if any(&["tip", "alert-info"]) {
        CalloutKind::Tip
    } else if any(&["important", "alert-danger"]) {
        CalloutKind::Danger
    } else {
        CalloutKind::Note
    }
}

fn mark_architecture_diagram(image: &mut ImageAsset) {
    let haystack = format!("{} {}", image.original_url, image.alt_text).to_lowercase();
    if ARCHITECTURE_KEYWORDS.iter().any(|keyword| haystack.contains(keyword)) {
        image.is_diagram = true;
        if image.alt_text == "image" {
            image.alt_text = DIAGRAM_ALT_TEXT.to_string();
        }
    }
}
