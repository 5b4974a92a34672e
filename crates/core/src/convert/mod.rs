//! Rule-driven HTML to Markdown conversion.
//!
//! A [`Converter`] walks a DOM subtree depth-first. For every element it first
//! renders the children, then hands that content to the first
//! [`ConversionRule`] whose filter accepts the element. Elements no rule
//! claims keep their rendered content and lose their tags.
//!
//! Rules are consulted in this order:
//!
//! 1. profile rules added through [`ConverterBuilder::rule`], in insertion order
//! 2. the baseline rules shared by every extractor ([`rules::baseline_rules`])
//! 3. plain CommonMark rules for headings, paragraphs, emphasis and lists
//!    ([`rules::standard_rules`])
//!
//! Text is emitted verbatim. Markdown special characters are never escaped;
//! rules that need escaping (table cells) do it themselves.
//!
//! # Example
//!
//! ```rust
//! use alchemize_core::convert::Converter;
//!
//! let converter = Converter::new();
//! let markdown = converter.convert(r#"<pre><code class="language-py">x = 1</code></pre>"#);
//! assert_eq!(markdown, "```python\nx = 1\n```");
//! ```

pub mod language;
pub mod rules;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

/// Predicate deciding whether a rule applies to an element.
pub type RuleFilter = Box<dyn Fn(ElementRef<'_>) -> bool + Send + Sync>;

/// Renders an element given its already-rendered child content.
pub type RuleReplacement = Box<dyn Fn(&str, ElementRef<'_>, &ConvertOptions) -> String + Send + Sync>;

/// Options shared by every rule of a converter
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Marker for unordered list items
    pub bullet_marker: String,
    /// Fence used to open and close code blocks
    pub fence: String,
    /// Table cells longer than this many characters are truncated with `...`
    pub max_cell_len: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { bullet_marker: "-".to_string(), fence: "```".to_string(), max_cell_len: 100 }
    }
}

/// A named (filter, replacement) pair overriding the default rendering.
pub struct ConversionRule {
    name: String,
    filter: RuleFilter,
    replacement: RuleReplacement,
}

impl ConversionRule {
    pub fn new<F, R>(name: impl Into<String>, filter: F, replacement: R) -> Self
    where
        F: Fn(ElementRef<'_>) -> bool + Send + Sync + 'static,
        R: Fn(&str, ElementRef<'_>, &ConvertOptions) -> String + Send + Sync + 'static,
    {
        Self { name: name.into(), filter: Box::new(filter), replacement: Box::new(replacement) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        (self.filter)(element)
    }

    pub fn apply(&self, content: &str, element: ElementRef<'_>, options: &ConvertOptions) -> String {
        (self.replacement)(content, element, options)
    }
}

impl std::fmt::Debug for ConversionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionRule").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Builder for [`Converter`]
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    options: ConvertOptions,
    profile_rules: Vec<ConversionRule>,
}

impl ConverterBuilder {
    pub fn options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a profile rule. Profile rules take precedence over the baseline.
    pub fn rule(mut self, rule: ConversionRule) -> Self {
        self.profile_rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = ConversionRule>) -> Self {
        self.profile_rules.extend(rules);
        self
    }

    pub fn build(self) -> Converter {
        let mut rules = self.profile_rules;
        rules.extend(rules::baseline_rules());
        rules.extend(rules::standard_rules());
        Converter { rules, options: self.options }
    }
}

/// HTML to Markdown converter holding an ordered rule list.
///
/// Each extraction builds its own converter, so no rule state is shared
/// between extractions.
#[derive(Debug)]
pub struct Converter {
    rules: Vec<ConversionRule>,
    options: ConvertOptions,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// A converter with the baseline and standard rules only.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Rule names in consultation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(ConversionRule::name)
    }

    /// Convert an HTML fragment to Markdown.
    pub fn convert(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        self.render(fragment.root_element())
    }

    /// Render the children of `element` to Markdown.
    ///
    /// The element itself is treated as a transparent container, which lets
    /// callers pass a selected main-content node directly.
    pub fn render(&self, element: ElementRef<'_>) -> String {
        let rendered = self.render_children(element);
        EXCESS_NEWLINES.replace_all(&rendered, "\n\n").trim().to_string()
    }

    fn render_children(&self, element: ElementRef<'_>) -> String {
        let mut output = String::new();

        for child in element.children() {
            match child.value() {
                Node::Text(text) => push_text(&mut output, text),
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        let rendered = self.render_element(child_element);
                        if output.ends_with([' ', '\n']) {
                            output.push_str(rendered.trim_start_matches(' '));
                        } else {
                            output.push_str(&rendered);
                        }
                    }
                }
                _ => {}
            }
        }

        output
    }

    fn render_element(&self, element: ElementRef<'_>) -> String {
        let content = self.render_children(element);

        match self.rules.iter().find(|rule| rule.matches(element)) {
            Some(rule) => rule.apply(&content, element, &self.options),
            None => content,
        }
    }
}

/// Append a text node with whitespace runs collapsed.
///
/// Whitespace at the start of a line or after a space is dropped.
fn push_text(output: &mut String, text: &str) {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    if output.ends_with([' ', '\n']) {
        output.push_str(collapsed.trim_start());
    } else {
        output.push_str(&collapsed);
    }
}
