//! HTML parsing and selector-based lookups.
//!
//! This module provides the [`Document`] type that every extractor works
//! against. Besides plain CSS selection it offers the ordered selector
//! fallback lookups that extractors use for titles, objectives and dates:
//! the first selector that yields a non-empty value wins, and a selector
//! that fails to parse simply counts as "no match".
//!
//! # Example
//!
//! ```rust
//! use alchemize_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Fallback</title></head>
//!         <body><h1 class="course-title">Networking Basics</h1></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let title = doc.first_text(&["h1.missing", "h1.course-title"]);
//! assert_eq!(title.as_deref(), Some("Networking Basics"));
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::{AlchemizeError, Result};

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string without preprocessing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use alchemize_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>").unwrap();
    /// assert_eq!(doc.select("h1").unwrap().len(), 1);
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html) })
    }

    /// Parses HTML after running the preprocessing passes over it.
    pub fn parse_with_preprocessing(html: &str, config: &PreprocessConfig) -> Result<Self> {
        let cleaned = preprocess_html(html, config);
        Self::parse(&cleaned)
    }

    /// Gets the underlying `scraper::Html`.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Serializes the whole document back to HTML.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// The `<html>` element of the document.
    pub fn root_element(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The `<body>` element, or the root element when the document has none.
    pub fn body(&self) -> ElementRef<'_> {
        self.first_match(&["body"]).unwrap_or_else(|| self.root_element())
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`AlchemizeError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).collect())
    }

    /// Gets the trimmed content of the `<title>` element if present and non-empty.
    pub fn title(&self) -> Option<String> {
        self.first_text(&["title"])
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Returns the first element matched by the first selector that matches anything.
    pub fn first_match(&self, selectors: &[&str]) -> Option<ElementRef<'_>> {
        selectors.iter().find_map(|selector| match parse_selector(selector) {
            Ok(sel) => self.html.select(&sel).next(),
            Err(err) => {
                tracing::debug!(%selector, %err, "skipping invalid selector");
                None
            }
        })
    }

    /// Returns true when any of the selectors matches at least one element.
    pub fn matches_any(&self, selectors: &[&str]) -> bool {
        self.first_match(selectors).is_some()
    }

    /// Ordered selector fallback over trimmed text content.
    ///
    /// For each selector, the first matched element is inspected; the first
    /// non-empty text wins.
    pub fn first_text(&self, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|selector| {
            let sel = parse_selector(selector).ok()?;
            let element = self.html.select(&sel).next()?;
            non_empty(&element_text(element))
        })
    }

    /// Ordered selector fallback preferring attribute values over text.
    ///
    /// For each selector, the first matched element's attributes are tried in
    /// `attrs` order before its text content.
    pub fn first_attr_or_text(&self, selectors: &[&str], attrs: &[&str]) -> Option<String> {
        selectors.iter().find_map(|selector| {
            let sel = parse_selector(selector).ok()?;
            let element = self.html.select(&sel).next()?;
            attrs
                .iter()
                .find_map(|attr| element.value().attr(attr).and_then(non_empty))
                .or_else(|| non_empty(&element_text(element)))
        })
    }

    /// Ordered selector fallback over lists.
    ///
    /// Returns the trimmed, non-empty texts of every element matched by the
    /// first selector that yields at least one of them.
    pub fn first_text_list(&self, selectors: &[&str]) -> Vec<String> {
        selectors
            .iter()
            .filter_map(|selector| parse_selector(selector).ok())
            .map(|sel| {
                self.html
                    .select(&sel)
                    .filter_map(|el| non_empty(&element_text(el)))
                    .collect::<Vec<_>>()
            })
            .find(|items| !items.is_empty())
            .unwrap_or_default()
    }
}

/// Parse a CSS selector, mapping failures to [`AlchemizeError::HtmlParseError`]
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AlchemizeError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Text content of an element with whitespace runs collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join("").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
