//! Export-mode layouts applied to converted Markdown.
//!
//! These are plain templates: the summary is the opening prose of the
//! document, and flashcards are built from the `##`/`###` heading structure.

use crate::content::ExportMode;

const SUMMARY_MAX_PARAGRAPHS: usize = 3;
const SUMMARY_MAX_CHARS: usize = 500;
const EMPTY_SUMMARY: &str = "No content to summarize.";

const REVIEW_QUESTIONS: &str = "## Review Questions\n\n\
- [ ] What is the main concept?\n\
- [ ] What are the key points?\n\
- [ ] How does this apply in practice?\n";

/// Study-notes scaffold appended to course content in study mode.
pub const STUDY_NOTES_TEMPLATE: &str = "## Study Notes\n\n\
### Key Points\n\n\
- \n\
- \n\
- \n\n\
### Key Terms\n\n\
| Term | Definition |\n\
|------|------------|\n\
|      |            |\n\n\
### Exam Questions\n\n\
- Q: \n  \
- A: \n";

/// Lay out `markdown` for the given export mode.
pub fn apply_export_mode(markdown: &str, mode: ExportMode) -> String {
    match mode {
        ExportMode::Reference => markdown.to_string(),
        ExportMode::Study => study_layout(markdown),
        ExportMode::Flashcards => flashcards_layout(markdown),
    }
}

/// Summary, separator, content, separator, review questions.
pub fn study_layout(markdown: &str) -> String {
    let summary = summarize(markdown).unwrap_or_else(|| EMPTY_SUMMARY.to_string());
    format!("## Summary\n\n{summary}\n\n---\n\n{markdown}\n\n---\n\n{REVIEW_QUESTIONS}")
}

/// A flashcard per `###` heading nested under a `##` section, then the content.
pub fn flashcards_layout(markdown: &str) -> String {
    let mut cards = String::new();
    let mut section: Option<&str> = None;

    for line in markdown.lines() {
        if let Some(title) = line.strip_prefix("## ") {
            section = Some(title.trim());
        } else if let Some(question) = line.strip_prefix("### ")
            && let Some(section) = section
        {
            cards.push_str(&format!("#flashcard\n**{section} - {}** ::\n\n", question.trim()));
        }
    }

    format!("# Flashcards\n\n{cards}\n\n---\n\n{markdown}")
}

/// The opening prose of `markdown`.
///
/// Takes up to three paragraphs that are not headings or code fences, cut
/// with `...` once the total passes 500 characters. Returns `None` when the
/// document has no prose paragraph.
pub fn summarize(markdown: &str) -> Option<String> {
    let paragraphs: Vec<&str> = markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.starts_with('#') && !p.starts_with("```"))
        .take(SUMMARY_MAX_PARAGRAPHS)
        .collect();

    if paragraphs.is_empty() {
        return None;
    }

    let mut summary = String::new();
    let mut char_count = 0;
    for paragraph in paragraphs {
        let len = paragraph.chars().count();
        if char_count + len > SUMMARY_MAX_CHARS {
            let keep = SUMMARY_MAX_CHARS.saturating_sub(char_count);
            summary.push_str(&paragraph.chars().take(keep).collect::<String>());
            summary.push_str("...");
            break;
        }
        summary.push_str(paragraph);
        summary.push_str("\n\n");
        char_count += len + 2;
    }

    Some(summary.trim().to_string())
}
