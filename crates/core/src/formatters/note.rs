//! Markdown notes with a YAML-style frontmatter block.
//!
//! The frontmatter is written by hand rather than through a YAML library:
//! the shape is fixed and small, and note tools only need the subset below.
//!
//! ```text
//! ---
//! title: "Deploying Containers"
//! author: "Sam Ops"
//! date: 2024-01-15
//! source: "https://blog.example.com/x"
//! tags:
//!   - Docker
//! metadata:
//!   exportMode: "reference"
//!   wordCount: 120
//! ---
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;

use crate::content::{ExtractedContent, MetadataValue};

/// File-name template used when none is configured.
pub const DEFAULT_FILENAME_TEMPLATE: &str = "{{date}}-{{title}}";

const MAX_FILE_NAME_CHARS: usize = 100;

static RESERVED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid reserved character pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid dash pattern"));

/// The frontmatter block, including the closing `---` and a blank line.
pub fn render_frontmatter(content: &ExtractedContent) -> String {
    let mut lines = vec!["---".to_string()];

    lines.push(format!("title: {}", quote(&content.title)));
    if let Some(author) = &content.author {
        lines.push(format!("author: {}", quote(author)));
    }
    if let Some(date) = &content.date {
        lines.push(format!("date: {}", date.format("%Y-%m-%d")));
    }
    if let Some(source) = &content.source_url {
        lines.push(format!("source: {}", quote(source)));
    }

    if !content.tags.is_empty() {
        lines.push("tags:".to_string());
        lines.extend(content.tags.iter().map(|tag| format!("  - {tag}")));
    }

    if !content.metadata.is_empty() {
        lines.push("metadata:".to_string());
        for (key, value) in &content.metadata {
            match value {
                MetadataValue::Text(text) => lines.push(format!("  {key}: {}", quote(text))),
                MetadataValue::List(items) => {
                    lines.push(format!("  {key}:"));
                    lines.extend(items.iter().map(|item| format!("    - {item}")));
                }
                scalar => lines.push(format!("  {key}: {scalar}")),
            }
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// The Markdown note, optionally preceded by frontmatter.
pub fn render_note(content: &ExtractedContent, include_frontmatter: bool) -> String {
    if include_frontmatter {
        format!("{}\n{}", render_frontmatter(content), content.markdown)
    } else {
        content.markdown.clone()
    }
}

/// Expand a file-name template.
///
/// `{{date}}` becomes `YYYY-MM-DD`, `{{time}}` becomes `HH-MM-SS` and
/// `{{title}}` the sanitized title. `.md` is appended when missing.
pub fn note_file_name(template: &str, title: &str, now: DateTime<Local>) -> String {
    let name = template
        .replace("{{date}}", &now.format("%Y-%m-%d").to_string())
        .replace("{{time}}", &now.format("%H-%M-%S").to_string())
        .replace("{{title}}", &sanitize_file_name(title));

    if name.ends_with(".md") { name } else { format!("{name}.md") }
}

/// Lowercase, dash-separated and at most 100 characters.
pub fn sanitize_file_name(name: &str) -> String {
    let name = RESERVED_CHARS.replace_all(name, "-");
    let name = WHITESPACE.replace_all(&name, "-");
    let name = DASH_RUNS.replace_all(&name, "-");

    name.chars().take(MAX_FILE_NAME_CHARS).collect::<String>().to_lowercase()
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
