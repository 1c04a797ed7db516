//! Page collection from build-pipeline outputs.
//!
//! The external pipeline hands over the complete page set in one of two
//! forms: a JSON manifest it emitted during the build, or the rendered
//! site directory itself. Both adapters return entries in a stable order
//! so downstream generation stays deterministic.

use std::{
    fs,
    path::{Path, PathBuf},
};

use cartograph_core::PageEntry;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Page collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed page manifest.
    #[error("manifest error in {path}: {message}")]
    Manifest { path: PathBuf, message: String },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collects page entries for sitemap generation.
#[derive(Debug)]
pub struct PageCollector;

impl PageCollector {
    /// Read a JSON page manifest emitted by the build pipeline.
    ///
    /// The manifest is an array of `{ "path", "lastmod"?, "changefreq"?,
    /// "priority"? }` records; entry order is preserved.
    pub fn from_manifest(path: &Path) -> Result<Vec<PageEntry>> {
        let content = fs::read_to_string(path)?;
        let pages: Vec<PageEntry> =
            serde_json::from_str(&content).map_err(|e| CollectorError::Manifest {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        info!(manifest = %path.display(), count = pages.len(), "loaded page manifest");
        Ok(pages)
    }

    /// Walk a rendered site directory and derive page entries from its
    /// `.html` outputs.
    ///
    /// `index.html` files map to their directory URL with a trailing
    /// slash; other files keep their name. The walk is sorted so repeated
    /// scans of the same tree produce the same sequence, and each entry's
    /// `lastmod` comes from the file's modification time.
    pub fn scan(dir: &Path) -> Result<Vec<PageEntry>> {
        let mut pages = Vec::new();

        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }

            let relative = path.strip_prefix(dir).unwrap_or(path);
            let url_path = page_path(relative);

            let last_modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from);

            debug!(file = %relative.display(), url = %url_path, "discovered page");

            pages.push(PageEntry {
                path: url_path,
                last_modified,
                change_freq: None,
                priority: None,
            });
        }

        info!(dir = %dir.display(), count = pages.len(), "scanned rendered site");
        Ok(pages)
    }
}

/// Map a rendered file path to its site URL path.
fn page_path(relative: &Path) -> String {
    let mut parts: Vec<&str> = relative.iter().filter_map(|c| c.to_str()).collect();

    if parts.last() == Some(&"index.html") {
        parts.pop();
        if parts.is_empty() {
            return "/".to_string();
        }
        return format!("/{}/", parts.join("/"));
    }

    format!("/{}", parts.join("/"))
}
