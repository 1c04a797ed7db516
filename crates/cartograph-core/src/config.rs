//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

/// Protocol ceiling for entries per sitemap document.
pub const MAX_ENTRIES_PER_DOCUMENT: usize = 50_000;

/// Main configuration structure for Cartograph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build output settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,
}

/// Build output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Base name for sitemap files ("sitemap" gives `sitemap-0.xml`, ...).
    #[serde(default = "default_filename_base")]
    pub filename_base: String,
}

/// Sitemap generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Whether sitemap generation is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum entries per sitemap document. Capped at the protocol
    /// ceiling of 50,000; exceeding it forces a split plus an index.
    #[serde(default = "default_entry_limit")]
    pub entry_limit: usize,

    /// Write a single empty urlset document when no pages are supplied.
    /// When false, an empty page set produces no files at all.
    #[serde(default = "default_true")]
    pub write_empty: bool,

    /// Path prefixes excluded from the sitemap.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether robots.txt generation is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allow rules, one path per line.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Disallow rules, one path per line.
    #[serde(default)]
    pub disallow: Vec<String>,
}

// Default value functions
fn default_output_dir() -> String {
    "public".to_string()
}

fn default_filename_base() -> String {
    "sitemap".to_string()
}

fn default_entry_limit() -> usize {
    MAX_ENTRIES_PER_DOCUMENT
}

fn default_true() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            filename_base: default_filename_base(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            entry_limit: default_entry_limit(),
            write_empty: true,
            exclude: Vec::new(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow: Vec::new(),
            disallow: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate for more flexibility.
    ///
    /// Layers `CARTOGRAPH__`-prefixed environment variables over the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("CARTOGRAPH").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Rejects a malformed base URL before any page processing can start.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        let parsed = Url::parse(self.base_url()).map_err(|e| {
            CoreError::config_with_source(
                format!("site.base_url is not a valid URL: {}", self.site.base_url),
                e,
            )
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::config(format!(
                "site.base_url must use http or https, got {}://",
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none() {
            return Err(CoreError::config("site.base_url must include a host"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url trailing slash is ignored");
        }

        if self.sitemap.entry_limit == 0 || self.sitemap.entry_limit > MAX_ENTRIES_PER_DOCUMENT {
            return Err(CoreError::config(format!(
                "sitemap.entry_limit must be between 1 and {MAX_ENTRIES_PER_DOCUMENT}"
            )));
        }

        if self.build.filename_base.is_empty()
            || self.build.filename_base.contains(['/', '\\'])
        {
            return Err(CoreError::config(
                "build.filename_base must be a bare file name",
            ));
        }

        Ok(())
    }

    /// Base URL with any trailing slash trimmed.
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url();
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
