//! Input retrieval from URLs, files and stdin.
//!
//! URL fetching needs the `fetch` feature; files and stdin are always
//! available.

use std::fs;
use std::path::Path;

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{AlchemizeError, Result};

/// HTTP settings for [`fetch_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Alchemize/0.1; web clipper)".to_string() }
    }
}

/// GET `url` and return the body as text.
///
/// Only `http` and `https` URLs are accepted. Redirects are followed.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| AlchemizeError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(AlchemizeError::InvalidUrl(format!("unsupported scheme: {}", parsed_url.scheme())));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(AlchemizeError::HttpError)?;

    tracing::debug!(%url, timeout = config.timeout, "fetching page");
    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() { AlchemizeError::Timeout { timeout: config.timeout } } else { AlchemizeError::HttpError(e) }
        })?
        .error_for_status()?;

    Ok(response.text().await?)
}

/// Read a local file as text.
pub fn fetch_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AlchemizeError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Read standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Alchemize"));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_invalid() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let config = FetchConfig::default();

        let result = runtime.block_on(fetch_url("not-a-url", &config));
        assert!(matches!(result, Err(AlchemizeError::InvalidUrl(_))));

        let result = runtime.block_on(fetch_url("ftp://example.com/file", &config));
        assert!(matches!(result, Err(AlchemizeError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<p>hi</p>").unwrap();

        assert_eq!(fetch_file(&path).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(AlchemizeError::FileNotFound(_))));
    }
}
