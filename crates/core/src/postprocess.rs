//! Markdown cleanup after conversion.
//!
//! [`postprocess_markdown`] runs an ordered list of line-oriented passes over
//! the converter output:
//!
//! 1. collapse three or more newlines into one blank line
//! 2. strip trailing whitespace from every line
//! 3. one space between a heading's `#` run and its text
//! 4. blank line before prose lines that directly follow another line
//! 5. no blank lines right inside a fenced code block
//! 6. table re-alignment ([`format_tables`])
//! 7. `[text]()` collapses to `text`
//! 8. single backtick pairs whose inner edges are not whitespace are unwrapped,
//!    including spans with inner spaces such as `` `npm install` ``
//! 9. trim the document
//!
//! Passes 3, 4, 6, 7 and 8 leave fenced code untouched. The pass list is
//! repeated until its output stops changing, so the result is always a fixed
//! point: postprocessing already postprocessed Markdown changes nothing.

use std::sync::LazyLock;

use regex::Regex;

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

static HEADING_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(\S)").expect("valid heading pattern"));

static TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[-:|\s]+\|$").expect("valid table separator pattern"));

static EMPTY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(\s*\)").expect("valid empty link pattern"));

/// Configuration for Markdown post-processing
#[derive(Debug, Clone)]
pub struct PostprocessConfig {
    /// Whether to re-align pipe tables
    pub format_tables: bool,
    /// Upper bound on how many times the pass list is repeated
    pub max_passes: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self { format_tables: true, max_passes: 10 }
    }
}

/// Post-process converted Markdown with the default configuration.
pub fn postprocess(markdown: &str) -> String {
    postprocess_markdown(markdown, &PostprocessConfig::default())
}

/// Post-process converted Markdown
pub fn postprocess_markdown(markdown: &str, config: &PostprocessConfig) -> String {
    let mut current = run_passes(markdown, config);

    for _ in 1..config.max_passes.max(1) {
        let next = run_passes(&current, config);
        if next == current {
            break;
        }
        current = next;
    }

    tracing::debug!(input_len = markdown.len(), output_len = current.len(), "postprocessed markdown");
    current
}

fn run_passes(markdown: &str, config: &PostprocessConfig) -> String {
    let mut processed = EXCESS_NEWLINES.replace_all(markdown, "\n\n").into_owned();
    processed = strip_trailing_whitespace(&processed);
    processed = map_outside_fences(&processed, |line| HEADING_SPACING.replace(line, "$1 $2").into_owned());
    processed = separate_blocks(&processed);
    processed = trim_fence_padding(&processed);

    if config.format_tables {
        processed = format_tables(&processed);
    }

    processed = map_outside_fences(&processed, |line| EMPTY_LINK.replace_all(line, "$1").into_owned());
    processed = map_outside_fences(&processed, strip_stray_backticks);
    processed.trim().to_string()
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Apply `f` to every line outside fenced code blocks.
///
/// Fence delimiter lines themselves are left as they are.
fn map_outside_fences<F>(markdown: &str, f: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut in_fence = false;
    markdown
        .split('\n')
        .map(|line| {
            if is_fence(line) {
                in_fence = !in_fence;
                line.to_string()
            } else if in_fence {
                line.to_string()
            } else {
                f(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_trailing_whitespace(markdown: &str) -> String {
    markdown.split('\n').map(str::trim_end).collect::<Vec<_>>().join("\n")
}

/// Insert a blank line between a line and a following prose line.
///
/// A line is left attached to its predecessor when it continues a list
/// (`-`, `*`, `+`, a digit), is indented, continues a table or quote, or
/// sits inside a fence. Lines starting with a digit that are not list items
/// are also left attached.
fn separate_blocks(markdown: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut previous: Option<&str> = None;

    for line in markdown.split('\n') {
        let fence = is_fence(line);
        if !in_fence
            && let Some(prev) = previous
            && !prev.trim().is_empty()
            && !line.trim().is_empty()
            && !continues_block(prev, line)
        {
            output.push("");
        }
        if fence {
            in_fence = !in_fence;
        }
        output.push(line);
        previous = Some(line);
    }

    output.join("\n")
}

fn continues_block(previous: &str, line: &str) -> bool {
    let Some(first) = line.chars().next() else {
        return true;
    };

    matches!(first, '-' | '*' | '+')
        || first.is_ascii_digit()
        || first.is_whitespace()
        || (first == '|' && previous.starts_with('|'))
        || (first == '>' && previous.starts_with('>'))
}

/// Drop blank lines directly after an opening fence and before a closing one.
fn trim_fence_padding(markdown: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut body_start = 0;

    for line in markdown.split('\n') {
        if is_fence(line) {
            if in_fence {
                while output.len() > body_start && output.last().is_some_and(|l| l.trim().is_empty()) {
                    output.pop();
                }
            }
            in_fence = !in_fence;
            output.push(line);
            body_start = output.len();
            continue;
        }

        if in_fence && output.len() == body_start && line.trim().is_empty() {
            continue;
        }
        output.push(line);
    }

    output.join("\n")
}

/// Remove backtick pairs wrapping a run with no surrounding whitespace.
///
/// A backtick next to another backtick is never touched, which keeps
/// double-backtick spans and fences intact.
fn strip_stray_backticks(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut output = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '`'
            && let Some(close) = stray_pair_end(&chars, i)
        {
            output.extend(&chars[i + 1..close]);
            i = close + 1;
            continue;
        }
        output.push(chars[i]);
        i += 1;
    }

    output
}

fn stray_pair_end(chars: &[char], open: usize) -> Option<usize> {
    if open > 0 && chars[open - 1] == '`' {
        return None;
    }
    let first = *chars.get(open + 1)?;
    if first == '`' || first.is_whitespace() {
        return None;
    }

    let close = open + 1 + chars[open + 1..].iter().position(|&c| c == '`')?;
    let last = chars[close - 1];
    if last.is_whitespace() || chars.get(close + 1) == Some(&'`') {
        return None;
    }
    Some(close)
}

/// Re-align every pipe table in `markdown`.
///
/// A table is a `|`-delimited header line, a dash separator line and one or
/// more `|`-delimited rows. Column width is the longest trimmed cell of that
/// column in this table; the separator gets exactly that many dashes and
/// every cell is right-padded to it. Rows with fewer cells than the header
/// keep the cells they have; cells past the header's column count are
/// dropped. Tables inside fenced code are left alone.
pub fn format_tables(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_fence(line) {
            in_fence = !in_fence;
        }

        if !in_fence && let Some(end) = table_end(&lines, i) {
            output.extend(format_table(&lines[i..end]));
            i = end;
            continue;
        }

        output.push(line.to_string());
        i += 1;
    }

    output.join("\n")
}

fn is_table_row(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|') && !line.ends_with("\\|")
}

fn is_table_separator(line: &str) -> bool {
    TABLE_SEPARATOR.is_match(line) && line.contains('-')
}

/// End index (exclusive) of a table starting at `start`, if one starts there.
fn table_end(lines: &[&str], start: usize) -> Option<usize> {
    let header = lines.get(start)?;
    let separator = lines.get(start + 1)?;
    if !is_table_row(header) || !is_table_separator(separator) {
        return None;
    }

    let rows = lines[start + 2..].iter().take_while(|line| is_table_row(line)).count();
    (rows > 0).then_some(start + 2 + rows)
}

fn format_table(block: &[&str]) -> Vec<String> {
    let header = split_cells(block[0]);
    let columns = header.len();
    let rows: Vec<Vec<String>> = block[2..]
        .iter()
        .map(|line| split_cells(line).into_iter().take(columns).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(1);
    }

    let render = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

    let mut formatted = Vec::with_capacity(block.len());
    formatted.push(render(header.as_slice()));
    formatted.push(format!("| {} |", separator.join(" | ")));
    formatted.extend(rows.iter().map(|row| render(row.as_slice())));
    formatted
}

/// Split a table line into trimmed cells on unescaped `|`.
fn split_cells(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('\\');
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
