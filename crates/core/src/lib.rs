//! Turn web page markup into structured, annotated Markdown notes.
//!
//! The pipeline normalizes raw HTML ([`preprocess`]), parses it
//! ([`parse`]), picks an extraction strategy ([`extract`]), renders the
//! chosen subtree with an ordered rule set ([`convert`]) and cleans up the
//! Markdown ([`postprocess`]). [`pipeline`] wires these together.
//!
//! ```rust
//! use alchemize_core::{ExportMode, default_registry, extract_html};
//!
//! let registry = default_registry(ExportMode::Reference);
//! let html = r#"<html><body><article><h1>Intro</h1><p>Some <strong>bold</strong> text.</p></article></body></html>"#;
//! let content = extract_html(html, Some("https://example.com/intro"), &registry).unwrap();
//!
//! assert_eq!(content.markdown, "# Intro\n\nSome **bold** text.");
//! ```

pub mod config;
pub mod content;
pub mod convert;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod images;
pub mod metadata;
pub mod parse;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod scoring;

pub use config::AlchemizeConfig;
pub use content::{ExportMode, ExtractedContent, ImageAsset, MetadataValue, OutputFormat};
pub use convert::{ConversionRule, ConvertOptions, Converter, ConverterBuilder};
pub use error::{AlchemizeError, Result};
pub use export::apply_export_mode;
pub use extract::{ExtractOptions, Extractor, ExtractorRegistry, GenericExtractor, SkillBuilderExtractor};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{note_file_name, render_frontmatter, render_json, render_note, sanitize_file_name};
pub use images::{ImageResolver, apply_local_paths, asset_file_name, resolve_images};
pub use parse::Document;
pub use pipeline::{ContentKind, default_registry, extract_html, extract_html_with_config, import_markdown};
pub use postprocess::{PostprocessConfig, format_tables, postprocess, postprocess_markdown};
pub use preprocess::{PreprocessConfig, preprocess_html, resolve_relative_urls, strip_page_chrome};
pub use scoring::{ScoreConfig, find_main_content};
