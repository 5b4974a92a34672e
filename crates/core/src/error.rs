//! Error types for Alchemize operations.
//!
//! This module defines the main error type [`AlchemizeError`]. Most of the
//! transformation pipeline never fails: malformed markup degrades to a
//! best-effort rendering instead. The errors below cover I/O at the edges
//! (fetching, configuration files) and the one hard failure of the core,
//! [`AlchemizeError::NoExtractorAvailable`].
//!
//! # Example
//!
//! ```rust
//! use alchemize_core::{AlchemizeError, Result};
//!
//! fn require_html(html: &str) -> Result<&str> {
//!     if html.trim().is_empty() {
//!         return Err(AlchemizeError::HtmlParseError("empty input".to_string()));
//!     }
//!     Ok(html)
//! }
//! # assert!(require_html("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction and conversion operations.
#[derive(Error, Debug)]
pub enum AlchemizeError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors.
    ///
    /// Returned for invalid CSS selectors or markup that cannot be read at all.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// No registered extractor accepted the document and no fallback is configured.
    #[error("No extractor can handle this document and no fallback is configured")]
    NoExtractorAvailable,

    /// A single image could not be resolved to a local path.
    ///
    /// This never aborts an extraction; batch resolution logs it and keeps
    /// the original reference.
    #[error("Failed to resolve image {url}: {reason}")]
    ImageResolution { url: String, reason: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// Configuration errors.
    ///
    /// Returned when a settings file exists but cannot be understood.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization errors.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for AlchemizeError.
pub type Result<T> = std::result::Result<T, AlchemizeError>;
