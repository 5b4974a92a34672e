//! Built-in conversion rules.
//!
//! [`baseline_rules`] are the rules every extractor profile shares.
//! [`standard_rules`] cover plain CommonMark output and are consulted last.
//! Profile-specific rules ([`code_container_rule`], [`callout_rule`]) are
//! exposed as constructors so extractors can register them ahead of the
//! baseline.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::language::{detect_language, first_code_descendant};
use super::{ConversionRule, ConvertOptions};
use crate::parse::element_text;
use crate::preprocess::PSEUDO_TABLE_ATTR;

static YOUTUBE_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube(?:-nocookie)?\.com/(?:watch\?v=|embed/|v/|shorts/)|youtu\.be/)([A-Za-z0-9_-]+)",
        r"youtube\.com/watch\?.*?v=([A-Za-z0-9_-]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

const SUPPRESSED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside", "noscript", "template", "head"];

const FLAT_CELL_TAGS: &[&str] = &["span", "strong", "b", "em", "i", "small", "sub", "sup", "mark", "abbr", "time", "br"];

const BLOCK_TAGS: &[&str] = &[
    "div", "section", "article", "main", "figure", "figcaption", "details", "summary", "dl", "dt", "dd", "address",
    "form", "fieldset", "center", "body",
];

/// Admonition types a callout renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Note,
    Warning,
    Tip,
    Danger,
    Info,
}

impl CalloutKind {
    /// Marker used inside `> [!TYPE]`.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Warning => "WARNING",
            Self::Tip => "TIP",
            Self::Danger => "DANGER",
            Self::Info => "INFO",
        }
    }

    /// Classify by class-name keywords.
    ///
    /// Class tokens are split on `-` and `_` so `alert-warning` matches
    /// `warning` while `tooltip` does not match `tip`. First match wins in
    /// the order warning, tip, danger, info; anything else is a note.
    pub fn classify(element: ElementRef<'_>) -> Self {
        let parts = class_parts(element);
        let has = |keywords: &[&str]| parts.iter().any(|part| keywords.contains(&part.as_str()));

        if has(&["warning", "caution"]) {
            Self::Warning
        } else if has(&["tip", "hint"]) {
            Self::Tip
        } else if has(&["danger", "error", "important"]) {
            Self::Danger
        } else if has(&["info"]) {
            Self::Info
        } else {
            Self::Note
        }
    }
}

/// Rules shared by every extractor profile, in priority order.
pub fn baseline_rules() -> Vec<ConversionRule> {
    vec![
        ConversionRule::new("suppressed", is_suppressed, |_: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            String::new()
        }),
        ConversionRule::new("code-block", is_pre_with_code, render_code_block),
        ConversionRule::new("table", is_tag("table"), render_table),
        ConversionRule::new("pseudo-table", is_pseudo_table, render_pseudo_table),
        ConversionRule::new("image", is_tag("img"), render_image),
        ConversionRule::new("link", is_link, render_link),
        ConversionRule::new("youtube", is_youtube_iframe, render_youtube),
        ConversionRule::new("iframe", is_tag("iframe"), render_iframe),
        callout_rule("callout", is_callout, CalloutKind::classify),
        ConversionRule::new("blockquote", is_tag("blockquote"), |content: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            block(&quote_lines(content.trim()))
        }),
        ConversionRule::new("list-item", is_tag("li"), render_list_item),
        ConversionRule::new("horizontal-rule", is_tag("hr"), |_: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            "\n\n---\n\n".to_string()
        }),
    ]
}

/// Plain CommonMark rules consulted after the baseline.
pub fn standard_rules() -> Vec<ConversionRule> {
    vec![
        ConversionRule::new("heading", is_heading, render_heading),
        ConversionRule::new("paragraph", is_tag("p"), |content: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            block(content.trim())
        }),
        ConversionRule::new("strong", is_any_tag(&["strong", "b"]), |content: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            wrap_inline(content, "**")
        }),
        ConversionRule::new("emphasis", is_any_tag(&["em", "i"]), |content: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            wrap_inline(content, "*")
        }),
        ConversionRule::new("strikethrough", is_any_tag(&["del", "s", "strike"]), |content: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            wrap_inline(content, "~~")
        }),
        ConversionRule::new("inline-code", is_tag("code"), render_inline_code),
        ConversionRule::new("line-break", is_tag("br"), |_: &str, _: ElementRef<'_>, _: &ConvertOptions| "\n".to_string()),
        ConversionRule::new("list", is_any_tag(&["ul", "ol"]), render_list),
        ConversionRule::new("preformatted", is_tag("pre"), render_code_block),
        ConversionRule::new("block", is_any_tag(BLOCK_TAGS), |content: &str, _: ElementRef<'_>, _: &ConvertOptions| {
            block(content.trim())
        }),
    ]
}

/// Fenced code rule for elements selected by `filter`.
///
/// The fence body is the text of the first nested `<code>`, or of the
/// element itself when it has none.
pub fn code_container_rule<F>(name: &str, filter: F) -> ConversionRule
where
    F: Fn(ElementRef<'_>) -> bool + Send + Sync + 'static,
{
    ConversionRule::new(name, filter, render_code_block)
}

/// Callout rule with a custom classifier.
pub fn callout_rule<F, C>(name: &str, filter: F, classify: C) -> ConversionRule
where
    F: Fn(ElementRef<'_>) -> bool + Send + Sync + 'static,
    C: Fn(ElementRef<'_>) -> CalloutKind + Send + Sync + 'static,
{
    ConversionRule::new(name, filter, move |content: &str, element: ElementRef<'_>, _: &ConvertOptions| {
        let kind = classify(element);
        block(&format!("> [!{}]\n{}", kind.marker(), quote_lines(content.trim())))
    })
}

/// Lowercased class tokens split on `-` and `_`.
pub fn class_parts(element: ElementRef<'_>) -> Vec<String> {
    element
        .value()
        .classes()
        .flat_map(|class| class.split(['-', '_']))
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when the element carries the class token `class` (case-insensitive).
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c.eq_ignore_ascii_case(class))
}

fn is_tag(tag: &'static str) -> impl Fn(ElementRef<'_>) -> bool + Send + Sync + 'static {
    move |element: ElementRef<'_>| element.value().name() == tag
}

fn is_any_tag(tags: &'static [&'static str]) -> impl Fn(ElementRef<'_>) -> bool + Send + Sync + 'static {
    move |element: ElementRef<'_>| tags.contains(&element.value().name())
}

fn is_suppressed(element: ElementRef<'_>) -> bool {
    SUPPRESSED_TAGS.contains(&element.value().name())
}

fn is_pre_with_code(element: ElementRef<'_>) -> bool {
    element.value().name() == "pre" && first_code_descendant(element).is_some()
}

fn is_heading(element: ElementRef<'_>) -> bool {
    heading_level(element).is_some()
}

fn heading_level(element: ElementRef<'_>) -> Option<usize> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_link(element: ElementRef<'_>) -> bool {
    element.value().name() == "a" && element.value().attr("href").is_some()
}

fn is_youtube_iframe(element: ElementRef<'_>) -> bool {
    element.value().name() == "iframe"
        && element
            .value()
            .attr("src")
            .is_some_and(|src| src.contains("youtube.com") || src.contains("youtu.be") || src.contains("youtube-nocookie.com"))
}

fn is_pseudo_table(element: ElementRef<'_>) -> bool {
    element.value().name() == "div" && element.value().attr(PSEUDO_TABLE_ATTR).is_some()
}

fn is_callout(element: ElementRef<'_>) -> bool {
    let role = element.value().attr("role").map(str::to_lowercase);
    if matches!(role.as_deref(), Some("note" | "alert")) {
        return true;
    }

    class_parts(element)
        .iter()
        .any(|part| matches!(part.as_str(), "callout" | "admonition" | "alert" | "note"))
}

/// Surround block content with blank lines; empty content renders as nothing.
fn block(content: &str) -> String {
    if content.is_empty() { String::new() } else { format!("\n\n{content}\n\n") }
}

fn wrap_inline(content: &str, marker: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return if content.is_empty() { String::new() } else { " ".to_string() };
    }

    let leading = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{marker}{trimmed}{marker}{trailing}")
}

/// Prefix every line with `> `; blank lines become a bare `>`.
fn quote_lines(content: &str) -> String {
    EXCESS_NEWLINES
        .replace_all(content, "\n\n")
        .lines()
        .map(|line| if line.trim().is_empty() { ">".to_string() } else { format!("> {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_code_block(content: &str, element: ElementRef<'_>, options: &ConvertOptions) -> String {
    let source = first_code_descendant(element).unwrap_or(element);
    let mut code: String = source.text().collect();
    if code.is_empty() {
        code = content.to_string();
    }
    let code = code.strip_suffix('\n').unwrap_or(&code);
    let language = detect_language(element).unwrap_or_default();

    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n", fence = options.fence)
}

fn render_inline_code(_content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    let code: String = element.text().collect();
    if code.is_empty() {
        return String::new();
    }
    if code.contains('`') {
        format!("`` {code} ``")
    } else {
        format!("`{code}`")
    }
}

fn render_heading(content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    let text = content.split_whitespace().collect::<Vec<_>>().join(" ");
    match heading_level(element) {
        Some(level) if !text.is_empty() => format!("\n\n{} {text}\n\n", "#".repeat(level)),
        _ => String::new(),
    }
}

fn render_image(_content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    let Some(src) = element.value().attr("src").map(str::trim).filter(|src| !src.is_empty()) else {
        return String::new();
    };
    let alt = element.value().attr("alt").map(str::trim).unwrap_or_default();

    match element.value().attr("title").map(str::trim).filter(|title| !title.is_empty()) {
        Some(title) => format!("![{alt}]({src} \"{title}\")"),
        None => format!("![{alt}]({src})"),
    }
}

fn render_link(content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    let href = element.value().attr("href").map(str::trim).unwrap_or_default();
    let text = content.trim();

    match (text.is_empty(), href.is_empty()) {
        (true, true) => String::new(),
        (false, true) => text.to_string(),
        (true, false) => href.to_string(),
        (false, false) if text == href => format!("<{href}>"),
        (false, false) => match element.value().attr("title").map(str::trim).filter(|title| !title.is_empty()) {
            Some(title) => format!("[{text}]({href} \"{title}\")"),
            None => format!("[{text}]({href})"),
        },
    }
}

/// Extract a video ID from a YouTube URL.
pub fn youtube_id(url: &str) -> Option<String> {
    YOUTUBE_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url).map(|caps| caps[1].to_string()))
}

fn render_youtube(_content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    element
        .value()
        .attr("src")
        .and_then(youtube_id)
        .map(|id| {
            format!(
                "\n\n[![YouTube Video](https://img.youtube.com/vi/{id}/0.jpg)](https://www.youtube.com/watch?v={id})\n\n"
            )
        })
        .unwrap_or_default()
}

fn render_iframe(_content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    match element.value().attr("src").map(str::trim).filter(|src| !src.is_empty()) {
        Some(src) => format!("\n\n<iframe src=\"{src}\"></iframe>\n\n"),
        None => String::new(),
    }
}

fn render_list(content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    let nested = element
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| parent.value().name() == "li");

    let body = content.trim_matches('\n');
    if body.trim().is_empty() {
        String::new()
    } else if nested {
        format!("\n{body}\n")
    } else {
        format!("\n\n{body}\n\n")
    }
}

fn render_list_item(content: &str, element: ElementRef<'_>, options: &ConvertOptions) -> String {
    let collapsed = EXCESS_NEWLINES.replace_all(content.trim(), "\n\n");
    if collapsed.is_empty() {
        return String::new();
    }

    let prefix = list_item_prefix(element, options);
    let indent = " ".repeat(prefix.chars().count());

    let mut lines = collapsed.lines();
    let mut output = format!("{prefix}{}", lines.next().unwrap_or_default().trim_end());
    for line in lines {
        output.push('\n');
        if !line.trim().is_empty() {
            output.push_str(&indent);
            output.push_str(line.trim_end());
        }
    }
    output.push('\n');
    output
}

/// Bullet or number for a list item.
///
/// Ordered items are numbered from the parent's `start` attribute plus the
/// count of preceding `<li>` siblings, so interleaved non-item children do
/// not shift the numbering.
fn list_item_prefix(element: ElementRef<'_>, options: &ConvertOptions) -> String {
    let parent = element.parent().and_then(ElementRef::wrap);
    match parent {
        Some(list) if list.value().name() == "ol" => {
            let start = list
                .value()
                .attr("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            let index = element
                .prev_siblings()
                .filter_map(ElementRef::wrap)
                .filter(|sibling| sibling.value().name() == "li")
                .count();
            format!("{}. ", start.saturating_add(index as i64))
        }
        _ => format!("{} ", options.bullet_marker),
    }
}

fn render_table(_content: &str, element: ElementRef<'_>, options: &ConvertOptions) -> String {
    let rows = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr" && nearest_table(*el) == Some(element))
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                .map(|cell| cell_text(cell, options))
                .collect::<Vec<_>>()
        })
        .collect();

    table_markdown(rows)
}

fn nearest_table<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "table")
}

fn render_pseudo_table(content: &str, element: ElementRef<'_>, _options: &ConvertOptions) -> String {
    let is_row = |el: &ElementRef<'_>| class_parts(*el).iter().any(|part| part == "row");

    let rows: Vec<Vec<ElementRef<'_>>> = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| *el != element && is_row(el))
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .take_while(|ancestor| *ancestor != element)
                .all(|ancestor| !is_row(&ancestor))
        })
        .map(|row| row.children().filter_map(ElementRef::wrap).collect())
        .collect();

    if rows.iter().flatten().any(|cell| !is_flat_cell(*cell)) {
        return block(content.trim());
    }

    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(|cell| element_text(cell).replace('|', "\\|")).collect())
        .collect();

    let markdown = table_markdown(rows);
    if markdown.is_empty() { block(content.trim()) } else { markdown }
}

/// True when a pseudo-table cell holds only text and plain formatting.
///
/// Anything else (links, code, images, block content) would lose information
/// when flattened into a pipe table cell.
fn is_flat_cell(cell: ElementRef<'_>) -> bool {
    cell.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| *el != cell)
        .all(|el| FLAT_CELL_TAGS.contains(&el.value().name()))
}

/// Cell text with whitespace collapsed, truncated and `|` escaped.
fn cell_text(cell: ElementRef<'_>, options: &ConvertOptions) -> String {
    let text = element_text(cell);
    let truncated = if text.chars().count() > options.max_cell_len {
        let keep = options.max_cell_len.saturating_sub(3);
        format!("{}...", text.chars().take(keep).collect::<String>())
    } else {
        text
    };
    truncated.replace('|', "\\|")
}

/// Pipe table with a `---` separator after the first row.
///
/// Rows are padded with empty cells to the widest row.
fn table_markdown(rows: Vec<Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows.into_iter().filter(|row| !row.is_empty()).collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let mut output = String::from("\n\n");
    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<&str> = (0..columns).map(|i| row.get(i).map_or("", String::as_str)).collect();
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
        if index == 0 {
            output.push_str(&format!("| {} |\n", vec!["---"; columns].join(" | ")));
        }
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Converter;
    use rstest::rstest;

    fn convert(html: &str) -> String {
        Converter::new().convert(html)
    }

    #[test]
    fn test_code_fence_fidelity() {
        let markdown = convert(r#"<pre><code class="language-python">x = 1</code></pre>"#);
        assert_eq!(markdown, "```python\nx = 1\n```");
    }

    #[test]
    fn test_code_block_keeps_markup_characters() {
        let markdown = convert("<pre><code>if a &lt; b &amp;&amp; c {\n    <b>not bold</b>\n}\n</code></pre>");
        assert_eq!(markdown, "```\nif a < b && c {\n    not bold\n}\n```");
    }

    #[test]
    fn test_code_block_language_alias() {
        let markdown = convert(r#"<pre class="lang-terraform"><code>resource "x" "y" {}</code></pre>"#);
        assert!(markdown.starts_with("```hcl\n"));
    }

    #[test]
    fn test_table() {
        let markdown = convert(
            "<table><tr><th>Name</th><th>Note</th></tr><tr><td>a|b</td><td>x</td></tr><tr><td>c</td></tr></table>",
        );
        assert_eq!(markdown, "| Name | Note |\n| --- | --- |\n| a\\|b | x |\n| c |  |");
    }

    #[test]
    fn test_table_without_rows() {
        assert_eq!(convert("<table></table>"), "");
    }

    #[test]
    fn test_table_cell_truncation() {
        let long = "x".repeat(150);
        let markdown = convert(&format!("<table><tr><th>{long}</th></tr><tr><td>y</td></tr></table>"));
        let header = markdown.lines().next().unwrap();

        assert_eq!(header, format!("| {}... |", "x".repeat(97)));
    }

    #[test]
    fn test_nested_table_rows_stay_in_their_table() {
        let markdown = convert(
            "<table><tr><td>outer<table><tr><td>inner</td></tr></table></td></tr><tr><td>two</td></tr></table>",
        );
        assert!(markdown.starts_with("| outerinner |\n| --- |\n| two |"));
    }

    #[test]
    fn test_pseudo_table() {
        let html = r#"<div class="grid-table" data-pseudo-table="true">
            <div class="row"><div>Key</div><div>Value</div></div>
            <div class="row"><div>a</div><div>1</div></div>
        </div>"#;
        assert_eq!(convert(html), "| Key | Value |\n| --- | --- |\n| a | 1 |");
    }

    #[test]
    fn test_pseudo_table_cells_are_not_truncated() {
        let long = "word ".repeat(40);
        let html = format!(
            r#"<div class="spec-table" data-pseudo-table="true"><div class="row"><span>Name</span><span>{long}</span></div></div>"#
        );
        let markdown = convert(&html);

        assert!(markdown.contains(long.trim()));
        assert!(!markdown.contains("..."));
    }

    #[test]
    fn test_pseudo_table_with_rich_cells_keeps_content() {
        let html = r#"<div class="spec-table" data-pseudo-table="true">
            <div class="row"><div><p>Intro paragraph</p></div><div>See <a href="https://x.example/doc">the docs</a> and <code>cfg</code>.</div></div>
        </div>"#;
        let markdown = convert(html);

        assert!(!markdown.starts_with('|'));
        assert!(markdown.contains("Intro paragraph"));
        assert!(markdown.contains("[the docs](https://x.example/doc)"));
        assert!(markdown.contains("`cfg`"));
    }

    #[rstest]
    #[case(r#"<img src="a.png" alt="Alt">"#, "![Alt](a.png)")]
    #[case(r#"<img src="a.png" alt="Alt" title="T">"#, "![Alt](a.png \"T\")")]
    #[case(r#"<img alt="no source">"#, "")]
    #[case(r#"<img src="" alt="empty">"#, "")]
    fn test_image(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(convert(html), expected);
    }

    #[rstest]
    #[case(r#"<a href="https://x.com">https://x.com</a>"#, "<https://x.com>")]
    #[case(r#"<a href="">text</a>"#, "text")]
    #[case(r#"<a href=""></a>"#, "")]
    #[case(r#"<a href="https://x.com"></a>"#, "https://x.com")]
    #[case(r#"<a href="https://x.com">site</a>"#, "[site](https://x.com)")]
    #[case(r#"<a href="https://x.com" title="X">site</a>"#, "[site](https://x.com \"X\")")]
    #[case(r#"<a name="anchor">plain</a>"#, "plain")]
    fn test_link(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(convert(html), expected);
    }

    #[rstest]
    #[case("https://www.youtube.com/embed/dQw4w9WgXcQ", Some("dQw4w9WgXcQ"))]
    #[case("https://youtu.be/abc_123-x?t=10", Some("abc_123-x"))]
    #[case("https://www.youtube.com/watch?v=abc123&list=x", Some("abc123"))]
    #[case("https://www.youtube.com/watch?feature=share&v=xyz789", Some("xyz789"))]
    #[case("https://www.youtube.com/channel/UC123", None)]
    fn test_youtube_id(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(youtube_id(url).as_deref(), expected);
    }

    #[test]
    fn test_youtube_iframe() {
        let markdown = convert(r#"<iframe src="https://www.youtube.com/embed/abc123"></iframe>"#);
        assert_eq!(
            markdown,
            "[![YouTube Video](https://img.youtube.com/vi/abc123/0.jpg)](https://www.youtube.com/watch?v=abc123)"
        );
        assert_eq!(convert(r#"<iframe src="https://www.youtube.com/channel/UC1"></iframe>"#), "");
    }

    #[test]
    fn test_generic_iframe() {
        let markdown = convert(r#"<iframe src="https://player.example.com/v/1"></iframe>"#);
        assert_eq!(markdown, r#"<iframe src="https://player.example.com/v/1"></iframe>"#);
    }

    #[rstest]
    #[case(r#"<div class="callout callout-warning"><p>Careful</p></div>"#, "WARNING")]
    #[case(r#"<div class="admonition hint">Try</div>"#, "TIP")]
    #[case(r#"<div class="alert alert-danger">Boom</div>"#, "DANGER")]
    #[case(r#"<div class="alert alert-info">FYI</div>"#, "INFO")]
    #[case(r#"<div class="callout tooltip">Plain</div>"#, "NOTE")]
    #[case(r#"<div role="note">Plain</div>"#, "NOTE")]
    fn test_callout_classification(#[case] html: &str, #[case] marker: &str) {
        let markdown = convert(html);
        assert!(markdown.starts_with(&format!("> [!{marker}]\n> ")), "{markdown}");
    }

    #[test]
    fn test_callout_multiline() {
        let markdown = convert(r#"<div class="callout"><p>One</p><p>Two</p></div>"#);
        assert_eq!(markdown, "> [!NOTE]\n> One\n>\n> Two");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(convert("<blockquote><p>a</p><p>b</p></blockquote>"), "> a\n>\n> b");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(convert("<ul><li>One</li><li> </li><li>Two</li></ul>"), "- One\n- Two");
    }

    #[rstest]
    #[case(r#"<ol start="9223372036854775807"><li>a</li><li>b</li></ol>"#, "9223372036854775807. a\n9223372036854775807. b")]
    #[case(r#"<ol start="-2"><li>a</li><li>b</li><li>c</li></ol>"#, "-2. a\n-1. b\n0. c")]
    #[case(r#"<ol start="many"><li>a</li><li>b</li></ol>"#, "1. a\n2. b")]
    fn test_ordered_list_start_extremes(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(convert(html), expected);
    }

    #[test]
    fn test_ordered_list_start_offset() {
        let markdown = convert(r#"<ol start="3"><li>c</li><!-- gap --><li>d</li></ol>"#);
        assert_eq!(markdown, "3. c\n4. d");
    }

    #[test]
    fn test_nested_list() {
        let markdown = convert("<ul><li>Parent<ol><li>Child</li><li>Next</li></ol></li><li>Sibling</li></ul>");
        assert_eq!(markdown, "- Parent\n  1. Child\n  2. Next\n- Sibling");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(convert("<p>a</p><hr><p>b</p>"), "a\n\n---\n\nb");
    }

    #[test]
    fn test_suppressed_elements() {
        let markdown = convert("<div><nav>Menu</nav><p>Body</p><aside><p>Side</p></aside><script>x()</script></div>");
        assert_eq!(markdown, "Body");
    }

    #[test]
    fn test_headings_and_inline() {
        let markdown = convert("<h2>Title  <em>here</em></h2><p>Some <strong> bold </strong>and <code>code</code>.</p>");
        assert_eq!(markdown, "## Title *here*\n\nSome **bold** and `code`.");
    }

    #[test]
    fn test_profile_code_container_rule() {
        let converter = Converter::builder()
            .rule(code_container_rule("code-container", |el: ElementRef<'_>| has_class(el, "code-block")))
            .build();
        let markdown = converter.convert(r#"<div class="code-block language-yml">a: 1</div>"#);

        assert_eq!(markdown, "```yaml\na: 1\n```");
    }
}
