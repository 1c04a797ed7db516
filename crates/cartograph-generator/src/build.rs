//! Build orchestration.
//!
//! Runs the generation steps in order against an output directory owned
//! by the external build pipeline. Unlike a full site build, nothing here
//! cleans the directory: only sitemap-owned files are written or removed.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use cartograph_core::{Config, PageEntry};
use thiserror::Error;
use tracing::info;

use crate::{
    robots::{RobotsError, RobotsGenerator},
    sitemap::{SitemapError, SitemapGenerator, SitemapReport},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Robots generation error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Report of a completed build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Number of unique URLs written across all documents.
    pub entry_count: usize,

    /// Paths of the sitemap documents written.
    pub document_paths: Vec<PathBuf>,

    /// Path of the sitemap index, when the output was split.
    pub index_path: Option<PathBuf>,

    /// Path of robots.txt, when generated.
    pub robots_path: Option<PathBuf>,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Orchestrates the generation steps against one output directory.
///
/// Callers must serialize concurrent builds targeting the same directory;
/// the builder does not lock it.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
        }
    }

    /// Execute the build steps in order: sitemap, then robots.
    ///
    /// The first error halts the build; the sitemap step validates every
    /// entry before it writes anything.
    pub fn build(&self, pages: &[PageEntry]) -> Result<BuildReport> {
        let start = Instant::now();
        let mut report = BuildReport::default();

        info!(
            output = %self.output_dir.display(),
            pages = pages.len(),
            "starting build"
        );

        // 1. Sitemap documents plus index
        let sitemap = if self.config.sitemap.enabled {
            let generator = SitemapGenerator::new(self.config.clone());
            generator.write(pages, &self.output_dir)?
        } else {
            SitemapReport::default()
        };

        // 2. robots.txt referencing the index, or the single document
        let sitemap_file = sitemap
            .entry_point()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .map(str::to_string);

        let robots = RobotsGenerator::new(self.config.clone());
        report.robots_path = robots.generate(&self.output_dir, sitemap_file.as_deref())?;

        report.entry_count = sitemap.entry_count;
        report.document_paths = sitemap.document_paths;
        report.index_path = sitemap.index_path;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            entries = report.entry_count,
            documents = report.document_paths.len(),
            index = report.index_path.is_some(),
            robots = report.robots_path.is_some(),
            duration_ms = report.duration_ms,
            "build complete"
        );

        Ok(report)
    }
}
