//! Robots.txt generation.
//!
//! Generates the robots.txt file for search engine crawlers, pointing
//! them at the generated sitemap.

use std::{
    fs,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use cartograph_core::Config;
use thiserror::Error;
use tracing::info;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate robots.txt, with a `Sitemap:` line for `sitemap_file`
    /// when a sitemap was written.
    pub fn generate(&self, output_dir: &Path, sitemap_file: Option<&str>) -> Result<Option<PathBuf>> {
        if !self.config.robots.enabled {
            return Ok(None);
        }

        info!("generating robots.txt");

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join("robots.txt");
        let mut file = File::create(&path)?;

        writeln!(file, "User-agent: *")?;

        for rule in &self.config.robots.disallow {
            writeln!(file, "Disallow: {rule}")?;
        }

        for rule in &self.config.robots.allow {
            writeln!(file, "Allow: {rule}")?;
        }

        if let Some(name) = sitemap_file {
            writeln!(file, "Sitemap: {}", self.config.url_for(name))?;
        }

        Ok(Some(path))
    }
}
