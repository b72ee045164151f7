//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Every section and key is optional. A missing or unreadable file falls back
//! to defaults.

use crate::domain::types::DEFAULT_MAX_CODE_LEN;
use crate::domain::{CodeLimits, GlyphSet};
use anyhow::{bail, Context};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Record file (tab-separated, one record per line)
    #[serde(default = "default_store_path")]
    pub path: String,
    /// Maximum records returned by a full scan
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    /// Lines longer than this are skipped on read and rejected on append
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            max_records: default_max_records(),
            max_line_len: default_max_line_len(),
        }
    }
}

fn default_store_path() -> String {
    "barcode.txt".to_string()
}

fn default_max_records() -> usize {
    200
}

fn default_max_line_len() -> usize {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    #[serde(default = "default_max_code_len")]
    pub max_code_len: usize,
    /// Accept the empty product code (marker-only barcode)
    #[serde(default)]
    pub allow_empty: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { max_code_len: default_max_code_len(), allow_empty: false }
    }
}

fn default_max_code_len() -> usize {
    DEFAULT_MAX_CODE_LEN
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlyphsConfig {
    #[serde(default = "default_mark")]
    pub mark: String,
    #[serde(default = "default_space")]
    pub space: String,
}

impl Default for GlyphsConfig {
    fn default() -> Self {
        Self { mark: default_mark(), space: default_space() }
    }
}

fn default_mark() -> String {
    GlyphSet::DEFAULT_MARK.to_string()
}

fn default_space() -> String {
    GlyphSet::DEFAULT_SPACE.to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub glyphs: GlyphsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    config_file: String,
    store_path: PathBuf,
    max_records: usize,
    max_line_len: usize,
    code_limits: CodeLimits,
    glyphs: GlyphSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: "default".to_string(),
            store_path: PathBuf::from(default_store_path()),
            max_records: default_max_records(),
            max_line_len: default_max_line_len(),
            code_limits: CodeLimits::default(),
            glyphs: GlyphSet::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
            .map(|config| Self { config_file: path.display().to_string(), ..config })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let toml_config: TomlConfig = toml::from_str(content)?;

        let mark = single_char("glyphs.mark", &toml_config.glyphs.mark)?;
        let space = single_char("glyphs.space", &toml_config.glyphs.space)?;
        let glyphs = GlyphSet::new(mark, space)?;

        Ok(Self {
            config_file: "inline".to_string(),
            store_path: PathBuf::from(toml_config.store.path),
            max_records: toml_config.store.max_records,
            max_line_len: toml_config.store.max_line_len,
            code_limits: CodeLimits {
                max_code_len: toml_config.codec.max_code_len,
                allow_empty: toml_config.codec.allow_empty,
            },
            glyphs,
        })
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                let error = format!("{e:#}");
                warn!(config_file = %path, error = %error, "config_fallback_to_defaults");
                Self::default()
            }
        }
    }

    /// Override the record file location
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    pub fn code_limits(&self) -> CodeLimits {
        self.code_limits
    }

    pub fn glyphs(&self) -> GlyphSet {
        self.glyphs
    }

    /// Builder method for tests to allow empty codes
    #[cfg(test)]
    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.code_limits.allow_empty = allow_empty;
        self
    }
}

fn single_char(key: &str, value: &str) -> anyhow::Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("{key} must be exactly one character, got {value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store_path(), Path::new("barcode.txt"));
        assert_eq!(config.max_records(), 200);
        assert_eq!(config.max_line_len(), 2000);
        assert_eq!(config.code_limits().max_code_len, 100);
        assert!(!config.code_limits().allow_empty);
        assert_eq!(config.glyphs(), GlyphSet::default());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.store_path(), Path::new("barcode.txt"));
        assert_eq!(config.max_records(), 200);
        assert_eq!(config.glyphs().mark(), '|');
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
[store]
max_records = 5

[codec]
allow_empty = true
"#,
        )
        .unwrap();
        assert_eq!(config.max_records(), 5);
        assert_eq!(config.max_line_len(), 2000);
        assert!(config.code_limits().allow_empty);
        assert_eq!(config.code_limits().max_code_len, 100);
    }

    #[test]
    fn test_multi_char_glyph_rejected() {
        let err = Config::from_toml_str("[glyphs]\nmark = \"||\"\n").unwrap_err();
        assert!(err.to_string().contains("glyphs.mark"));
    }

    #[test]
    fn test_identical_glyphs_rejected() {
        assert!(Config::from_toml_str("[glyphs]\nmark = \"x\"\nspace = \"x\"\n").is_err());
    }

    #[test]
    fn test_with_store_path() {
        let config = Config::default().with_store_path("/tmp/other.txt");
        assert_eq!(config.store_path(), Path::new("/tmp/other.txt"));
    }
}
