//! User settings.
//!
//! Settings live in a JSON file, by default `<config_dir>/alchemize/config.json`.
//! Every field has a default, so a partial file (or no file) is valid.
//!
//! # Example
//!
//! ```rust
//! use alchemize_core::config::AlchemizeConfig;
//! use alchemize_core::ExportMode;
//!
//! let config: AlchemizeConfig = serde_json::from_str(r#"{"export_mode": "study"}"#).unwrap();
//! assert_eq!(config.export_mode, ExportMode::Study);
//! assert!(config.auto_tagging);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::content::ExportMode;
use crate::extract::ExtractOptions;
use crate::formatters::DEFAULT_FILENAME_TEMPLATE;
use crate::{AlchemizeError, Result};

const APP_DIR: &str = "alchemize";
const CONFIG_FILE: &str = "config.json";

/// Persistent user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlchemizeConfig {
    /// Layout used when no mode is given on the command line.
    pub export_mode: ExportMode,
    /// Add tags detected from the content.
    pub auto_tagging: bool,
    /// Tags added to every note.
    pub custom_tags: Vec<String>,
    /// Supports `{{date}}`, `{{time}}` and `{{title}}`.
    pub filename_template: String,
    pub include_frontmatter: bool,
}

impl Default for AlchemizeConfig {
    fn default() -> Self {
        Self {
            export_mode: ExportMode::Reference,
            auto_tagging: true,
            custom_tags: Vec::new(),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            include_frontmatter: true,
        }
    }
}

impl AlchemizeConfig {
    /// `<config_dir>/alchemize/config.json`, when the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Read settings from `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// [`AlchemizeError::ConfigError`] when the file exists but is not valid
    /// settings JSON, [`AlchemizeError::WriteError`] when it cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AlchemizeError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Read settings from [`default_path`](Self::default_path), or use defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Extractor options derived from these settings.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions { auto_tagging: self.auto_tagging, ..ExtractOptions::with_mode(self.export_mode) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AlchemizeConfig::default();

        assert_eq!(config.export_mode, ExportMode::Reference);
        assert_eq!(config.filename_template, "{{date}}-{{title}}");
        assert!(config.include_frontmatter);
        assert!(config.custom_tags.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = AlchemizeConfig::load(&dir.path().join("absent.json")).unwrap();

        assert_eq!(config, AlchemizeConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"export_mode": "flashcards", "custom_tags": ["inbox"]}"#).unwrap();

        let config = AlchemizeConfig::load(&path).unwrap();
        assert_eq!(config.export_mode, ExportMode::Flashcards);
        assert_eq!(config.custom_tags, vec!["inbox"]);
        assert!(config.auto_tagging);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AlchemizeConfig::load(&path), Err(AlchemizeError::ConfigError(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AlchemizeConfig { auto_tagging: false, custom_tags: vec!["inbox".to_string()], ..Default::default() };

        config.save(&path).unwrap();
        assert_eq!(AlchemizeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"image_folder": "assets", "include_frontmatter": false}"#).unwrap();

        let config = AlchemizeConfig::load(&path).unwrap();
        assert!(!config.include_frontmatter);
        assert_eq!(config, AlchemizeConfig { include_frontmatter: false, ..Default::default() });
    }

    #[test]
    fn test_extract_options() {
        let config = AlchemizeConfig { export_mode: ExportMode::Study, auto_tagging: false, ..Default::default() };
        let options = config.extract_options();

        assert_eq!(options.export_mode, ExportMode::Study);
        assert!(!options.auto_tagging);
    }
}
