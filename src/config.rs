//! Site configuration module.
//!
//! Handles loading and validating the `config.toml` at the root of the site
//! source. Stock defaults are overridden by whatever keys the file sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! images_directory = "images"  # Where tag filenames are resolved; also the
//!                              # URL prefix and destination of thumbnails.
//!                              # Accepts nested paths like "assets/posts/images".
//! images_css_class = "image"   # Class of the <a> wrapping each thumbnail
//! destination = "_site"        # Build output directory, relative to the source
//!
//! [processing]
//! max_processes = 4            # Max parallel page workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the site source root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults; a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the source images, relative to the site source.
    pub images_directory: String,
    /// CSS class of the link wrapping each thumbnail.
    pub images_css_class: String,
    /// Build output directory, relative to the site source.
    pub destination: String,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            images_directory: "images".to_string(),
            images_css_class: "image".to_string(),
            destination: "_site".to_string(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images_directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "images_directory must not be empty".into(),
            ));
        }
        if self.images_css_class.trim().is_empty() {
            return Err(ConfigError::Validation(
                "images_css_class must not be empty".into(),
            ));
        }
        if self.destination.trim().is_empty() {
            return Err(ConfigError::Validation(
                "destination must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of pages rendered in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site source directory.
///
/// Returns the stock defaults when the file does not exist.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbnailify Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory where all the images are, relative to the site source.
# `{% t foo.png %}` reads <source>/<images_directory>/foo.png, and the
# thumbnail foo_t.png is published next to it in the built site.
# Nested paths such as "assets/posts/images" are accepted.
images_directory = "images"

# Class of the <a> element wrapping each thumbnail.
images_css_class = "image"

# Build output directory, relative to the site source.
destination = "_site"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of pages rendered in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
