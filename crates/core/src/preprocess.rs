//! Raw HTML normalization.
//!
//! [`preprocess_html`] runs a fixed, ordered list of string-to-string passes
//! before the markup is parsed into a [`Document`](crate::Document). Later
//! passes assume the normalization done by earlier ones:
//!
//! 1. attribute cleanup (`style`, `data-*`, empty `class`)
//! 2. whitespace collapsing outside `<pre>`/`<code>`
//! 3. pseudo-table marking (`data-pseudo-table` on div-based tables)
//! 4. code block normalization (`<pre>` always wraps a `<code>`, `data-language`)
//! 5. empty `p`/`div`/`span` removal and `<br>` run collapsing
//! 6. heading demotion (only the first `<h1>` survives)
//!
//! No pass ever fails. A pass whose rewriter errors, or that cannot classify
//! a structure, returns its input unchanged.

use std::cell::Cell;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

/// Attribute added to div-based tables so the converter can render them as tables.
pub const PSEUDO_TABLE_ATTR: &str = "data-pseudo-table";

/// Attribute carrying the language detected from a `language-*` class.
pub const DATA_LANGUAGE_ATTR: &str = "data-language";

static PRESERVED_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre\b[^>]*>.*?</pre\s*>|<code\b[^>]*>.*?</code\s*>").expect("valid preserved region pattern")
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static DIV_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<div\b([^>]*)>").expect("valid div pattern"));

static DIV_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<div\b([^>]*)>|</div\s*>").expect("valid div tag pattern"));

static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#).expect("valid class pattern"));

static PRE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre\b([^>]*)>(.*?)</pre\s*>").expect("valid pre pattern"));

static CODE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<code\b([^>]*)>").expect("valid code pattern"));

static LANGUAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class\s*=\s*["'][^"']*\b(?:language|lang)-([\w+#.-]+)"#).expect("valid language class pattern")
});

static EMPTY_ELEMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["p", "div", "span"]
        .iter()
        .filter_map(|tag| Regex::new(&format!(r"(?i)<{tag}(?:\s[^>]*)?>\s*</{tag}\s*>")).ok())
        .collect()
});

static BREAK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:<br\s*/?>\s*){2,}").expect("valid br pattern"));

/// Selectors for page chrome that never belongs in a note.
const CHROME_SELECTORS: &[&str] = &[
    "script",
    "style",
    "nav",
    "header",
    "footer",
    "aside",
    ".advertisement",
    ".ads",
    ".cookie-banner",
    ".newsletter-signup",
    "[role=\"banner\"]",
    "[role=\"navigation\"]",
    "[role=\"complementary\"]",
];

/// Configuration for HTML preprocessing
///
/// Every pass is enabled by default. The order in which enabled passes run
/// is fixed and does not depend on this configuration.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Strip inline styles, `data-*` attributes and empty `class` attributes
    pub clean_attributes: bool,
    /// Collapse whitespace outside preformatted regions
    pub normalize_whitespace: bool,
    /// Mark div-based pseudo-tables for structural conversion
    pub mark_pseudo_tables: bool,
    /// Ensure `<pre>` wraps a `<code>` and expose the language
    pub normalize_code_blocks: bool,
    /// Remove whitespace-only `p`/`div`/`span` and collapse `<br>` runs
    pub remove_empty_elements: bool,
    /// Keep the first `<h1>` and demote every later one to `<h2>`
    pub demote_headings: bool,
    /// Maximum passes when removing nested empty elements
    pub max_empty_element_passes: usize,
    /// Base URL that relative `href`/`src` values are resolved against
    pub base_url: Option<Url>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            clean_attributes: true,
            normalize_whitespace: true,
            mark_pseudo_tables: true,
            normalize_code_blocks: true,
            remove_empty_elements: true,
            demote_headings: true,
            max_empty_element_passes: 10,
            base_url: None,
        }
    }
}

/// Preprocess raw HTML before it is parsed and converted
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut processed = match &config.base_url {
        Some(base) => resolve_relative_urls(html, base),
        None => html.to_string(),
    };

    if config.clean_attributes {
        processed = clean_attributes(&processed);
    }

    if config.normalize_whitespace {
        processed = normalize_whitespace(&processed);
    }

    if config.mark_pseudo_tables {
        processed = mark_pseudo_tables(&processed);
    }

    if config.normalize_code_blocks {
        processed = normalize_code_blocks(&processed);
    }

    if config.remove_empty_elements {
        processed = remove_empty_elements(&processed, config.max_empty_element_passes);
    }

    if config.demote_headings {
        processed = demote_extra_headings(&processed);
    }

    tracing::debug!(input = html.len(), output = processed.len(), "preprocessed html");
    processed
}

/// Remove navigation, ads and other page chrome elements together with their content
pub fn strip_page_chrome(html: &str) -> String {
    let handlers = CHROME_SELECTORS
        .iter()
        .map(|selector| {
            lol_html::element!(selector, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    rewrite_html(html, lol_html::Settings { element_content_handlers: handlers, ..Default::default() })
}

/// Make link targets and image sources absolute against `base`.
///
/// Values that are already absolute, empty or unparseable are left alone.
pub fn resolve_relative_urls(html: &str, base: &Url) -> String {
    let absolute = |value: &str| {
        if value.trim().is_empty() {
            return None;
        }
        base.join(value.trim()).ok().map(String::from)
    };

    let handlers = vec![
        lol_html::element!("a[href]", |el| {
            if let Some(href) = el.get_attribute("href").and_then(|href| absolute(&href)) {
                el.set_attribute("href", &href)?;
            }
            Ok(())
        }),
        lol_html::element!("img", |el| {
            for attr in ["src", "data-src"] {
                if let Some(src) = el.get_attribute(attr).and_then(|src| absolute(&src)) {
                    el.set_attribute(attr, &src)?;
                }
            }
            Ok(())
        }),
    ];

    rewrite_html(html, lol_html::Settings { element_content_handlers: handlers, ..Default::default() })
}

/// Run a streaming rewrite, falling back to the input when the rewriter fails
fn rewrite_html(html: &str, settings: lol_html::Settings<'_, '_>) -> String {
    let mut output = Vec::new();
    let mut rewriter = lol_html::HtmlRewriter::new(settings, |c: &[u8]| output.extend_from_slice(c));

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| html.to_string())
}

/// Apply `f` to every stretch of markup outside `<pre>`/`<code>` regions.
///
/// Preformatted regions are copied byte-for-byte.
fn map_unprotected(html: &str, f: impl Fn(&str) -> String) -> String {
    let mut output = String::with_capacity(html.len());
    let mut last = 0;

    for region in PRESERVED_REGION.find_iter(html) {
        output.push_str(&f(&html[last..region.start()]));
        output.push_str(region.as_str());
        last = region.end();
    }
    output.push_str(&f(&html[last..]));

    output
}

/// Strip presentational attributes while keeping semantic ones
fn clean_attributes(html: &str) -> String {
    let handlers = vec![lol_html::element!("*", |el| {
        let noisy: Vec<String> = el
            .attributes()
            .iter()
            .filter(|attr| {
                let name = attr.name();
                name == "style" || name.starts_with("data-") || (name == "class" && attr.value().trim().is_empty())
            })
            .map(|attr| attr.name())
            .collect();

        for name in noisy {
            el.remove_attribute(&name);
        }
        Ok(())
    })];

    rewrite_html(html, lol_html::Settings { element_content_handlers: handlers, ..Default::default() })
}

/// Collapse whitespace runs outside preformatted regions.
///
/// Every run (newlines included) becomes a single space, so per-line trimming
/// and newline-run collapsing reduce to trimming the document edges.
fn normalize_whitespace(html: &str) -> String {
    let collapsed = map_unprotected(html, |segment| WHITESPACE_RUN.replace_all(segment, " ").into_owned());
    collapsed.trim().to_string()
}

/// Mark divs carrying a `table` class token that contain a `row` div.
///
/// Class names are split on `-` and `_`, so `spec-table` and `table-row`
/// count while `notable` and `stable` do not. Blocks without row markers
/// are ambiguous and stay untouched.
fn mark_pseudo_tables(html: &str) -> String {
    DIV_OPEN
        .replace_all(html, |caps: &Captures| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

            if attrs.contains(PSEUDO_TABLE_ATTR) || !has_class_token(attrs, "table") {
                return whole.to_string();
            }

            let end = caps.get(0).map_or(html.len(), |m| m.end());
            if !contains_row_div(&html[end..]) {
                return whole.to_string();
            }

            format!("<div{} {}=\"true\">", attrs.trim_end_matches('/'), PSEUDO_TABLE_ATTR)
        })
        .into_owned()
}

/// Whether the markup up to the close of the current div opens a `row` div.
fn contains_row_div(rest: &str) -> bool {
    let mut depth = 1usize;

    for tag in DIV_TAG.captures_iter(rest) {
        match tag.get(1) {
            Some(attrs) => {
                if has_class_token(attrs.as_str(), "row") {
                    return true;
                }
                depth += 1;
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return false;
                }
            }
        }
    }

    false
}

/// Whether any class in `attrs` has `token` as a `-`/`_`-separated part
fn has_class_token(attrs: &str, token: &str) -> bool {
    CLASS_ATTR.captures(attrs).and_then(|caps| caps.get(1)).is_some_and(|classes| {
        classes
            .as_str()
            .split_whitespace()
            .flat_map(|class| class.split(['-', '_']))
            .any(|part| part.eq_ignore_ascii_case(token))
    })
}

/// Give every `<pre>` a `<code>` child and expose `language-*` classes as `data-language`
fn normalize_code_blocks(html: &str) -> String {
    let wrapped = PRE_BLOCK.replace_all(html, |caps: &Captures| {
        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let inner = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        if inner.trim_start().to_ascii_lowercase().starts_with("<code") {
            return whole.to_string();
        }

        let code_class = LANGUAGE_CLASS
            .captures(attrs)
            .and_then(|lang| lang.get(1))
            .map(|lang| format!(" class=\"language-{}\"", lang.as_str()))
            .unwrap_or_default();

        format!("<pre{}><code{}>{}</code></pre>", attrs, code_class, inner)
    });

    CODE_OPEN
        .replace_all(&wrapped, |caps: &Captures| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

            if attrs.contains(DATA_LANGUAGE_ATTR) {
                return whole.to_string();
            }

            match LANGUAGE_CLASS.captures(attrs).and_then(|lang| lang.get(1)) {
                Some(lang) => format!(
                    "<code{} {}=\"{}\">",
                    attrs.trim_end_matches('/'),
                    DATA_LANGUAGE_ATTR,
                    lang.as_str().to_lowercase()
                ),
                None => whole.to_string(),
            }
        })
        .into_owned()
}

/// Remove whitespace-only `p`, `div` and `span` elements and collapse `<br>` runs.
///
/// Removal repeats so that containers emptied by an earlier pass also go.
fn remove_empty_elements(html: &str, max_passes: usize) -> String {
    let mut result = html.to_string();

    for _ in 0..max_passes.max(1) {
        let previous = result.clone();
        result = map_unprotected(&result, |segment| {
            EMPTY_ELEMENTS
                .iter()
                .fold(segment.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
        });

        if result == previous {
            break;
        }
    }

    map_unprotected(&result, |segment| BREAK_RUN.replace_all(segment, "<br>").into_owned())
}

/// Keep the first `<h1>` and demote every later one to `<h2>`, attributes included
fn demote_extra_headings(html: &str) -> String {
    let seen = Cell::new(0usize);

    let handlers = vec![lol_html::element!("h1", |el| {
        seen.set(seen.get() + 1);
        if seen.get() > 1 {
            el.set_tag_name("h2")?;
        }
        Ok(())
    })];

    rewrite_html(html, lol_html::Settings { element_content_handlers: handlers, ..Default::default() })
}
