//! Extraction results.
//!
//! [`ExtractedContent`] is the single output record of one extraction run.
//! It is created fresh per call and owned by the caller; nothing from one
//! extraction is kept for the next.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::formatters::{render_json, render_note};
use crate::{AlchemizeError, Result};

/// How the note body is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// The converted content as-is.
    #[default]
    Reference,
    /// Summary and review questions around the content.
    Study,
    /// Question/answer cards built from the section structure.
    Flashcards,
}

impl ExportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Study => "study",
            Self::Flashcards => "flashcards",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportMode {
    type Err = AlchemizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reference" => Ok(Self::Reference),
            "study" => Ok(Self::Study),
            "flashcards" | "flashcard" => Ok(Self::Flashcards),
            other => Err(AlchemizeError::ConfigError(format!("unknown export mode: {other}"))),
        }
    }
}

/// Output format for an extraction result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown note, optionally with frontmatter.
    #[default]
    Markdown,
    /// The whole record as JSON.
    Json,
    /// The preprocessed HTML, before conversion.
    Html,
}

impl FromStr for OutputFormat {
    type Err = AlchemizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(AlchemizeError::ConfigError(format!(
                "invalid format: {other}. Valid options: markdown, json, html"
            ))),
        }
    }
}

/// An extractor-specific metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::List(values) => f.write_str(&values.join(", ")),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<ExportMode> for MetadataValue {
    fn from(mode: ExportMode) -> Self {
        Self::Text(mode.as_str().to_string())
    }
}

/// An image referenced by the extracted content.
///
/// Identity is `original_url`: one extraction never lists the same URL twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub original_url: String,
    /// Set once the image has been stored locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    pub alt_text: String,
    pub is_diagram: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ImageAsset {
    pub fn new(original_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            local_path: None,
            alt_text: alt_text.into(),
            is_diagram: false,
            mime_type: None,
        }
    }
}

/// The result of one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    /// Never empty; extractors fall back to a placeholder.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Detection order is preserved.
    pub tags: Vec<String>,
    /// Fully postprocessed Markdown body.
    pub markdown: String,
    pub images: Vec<ImageAsset>,
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl ExtractedContent {
    /// An empty record with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
            date: None,
            source_url: None,
            tags: Vec::new(),
            markdown: String::new(),
            images: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Insert or replace a metadata entry.
    pub fn set_metadata(&mut self, key: &str, value: impl Into<MetadataValue>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn metadata_text(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Append tags that are not present yet, keeping order.
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !tag.trim().is_empty() && !self.tags.iter().any(|existing| existing.eq_ignore_ascii_case(&tag)) {
                self.tags.push(tag);
            }
        }
    }

    /// Markdown note with an optional frontmatter block.
    pub fn to_note(&self, include_frontmatter: bool) -> String {
        render_note(self, include_frontmatter)
    }

    /// The record as a JSON document.
    pub fn to_json(&self) -> Result<String> {
        render_json(self)
    }
}
