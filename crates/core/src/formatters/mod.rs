//! Output rendering for extracted content.
//!
//! [`note`] produces the Markdown note with its frontmatter block and the
//! note's file name; [`json`] serializes the whole record.

pub mod json;
pub mod note;

pub use json::{render_json, render_json_compact};
pub use note::{DEFAULT_FILENAME_TEMPLATE, note_file_name, render_frontmatter, render_note, sanitize_file_name};
