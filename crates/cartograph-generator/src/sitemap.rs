//! Sitemap generation.
//!
//! Turns the page list handed over by the build pipeline into one or more
//! urlset documents, plus a sitemapindex when the entry count exceeds the
//! per-document ceiling.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2026-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use std::{
    borrow::Cow,
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use cartograph_core::{ChangeFreq, Config, PageEntry};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Base URL rejected at generation time, before any page processing.
    #[error("invalid base URL {url:?}: {message}")]
    Config { url: String, message: String },

    /// A page entry that cannot become a sitemap URL.
    #[error("invalid page entry {path:?}: {message}")]
    InvalidEntry { path: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

impl SitemapError {
    fn invalid_entry(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A resolved sitemap URL entry.
#[derive(Debug, Clone)]
struct UrlEntry {
    loc: String,
    lastmod: Option<DateTime<Utc>>,
    changefreq: Option<ChangeFreq>,
    priority: Option<f32>,
}

/// Report of a completed sitemap write.
#[derive(Debug, Clone, Default)]
pub struct SitemapReport {
    /// Paths of the urlset documents written, in chunk order.
    pub document_paths: Vec<PathBuf>,

    /// Path of the sitemapindex, present only when the output was split.
    pub index_path: Option<PathBuf>,

    /// Number of unique URLs across all documents.
    pub entry_count: usize,
}

impl SitemapReport {
    /// File crawlers should be pointed at: the index when present,
    /// otherwise the single document.
    pub fn entry_point(&self) -> Option<&Path> {
        self.index_path
            .as_deref()
            .or_else(|| self.document_paths.first().map(PathBuf::as_path))
    }
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolve and deduplicate without writing anything.
    ///
    /// Returns the number of unique URLs the sitemap would contain.
    pub fn check(&self, pages: &[PageEntry]) -> Result<usize> {
        Ok(self.resolve_entries(pages)?.len())
    }

    /// Resolve, deduplicate, chunk and write the sitemap for `pages`.
    ///
    /// All validation and serialization happen before the first write, so
    /// an invalid entry leaves `output_dir` untouched. Callers must hold
    /// exclusive ownership of `output_dir` for the duration of the call;
    /// concurrent builds into the same directory are not coordinated here.
    pub fn write(&self, pages: &[PageEntry], output_dir: &Path) -> Result<SitemapReport> {
        let entries = self.resolve_entries(pages)?;

        debug!(
            pages = pages.len(),
            unique = entries.len(),
            "resolved sitemap entries"
        );

        if entries.is_empty() && !self.config.sitemap.write_empty {
            info!("no sitemap entries and write_empty is off, skipping");
            self.remove_stale(output_dir, 0, false)?;
            return Ok(SitemapReport::default());
        }

        // An empty page set still produces one well-formed empty document.
        let documents: Vec<String> = if entries.is_empty() {
            vec![self.urlset_xml(&[])]
        } else {
            entries
                .chunks(self.config.sitemap.entry_limit.max(1))
                .map(|chunk| self.urlset_xml(chunk))
                .collect()
        };

        fs::create_dir_all(output_dir)?;

        let mut report = SitemapReport {
            entry_count: entries.len(),
            ..SitemapReport::default()
        };

        for (n, xml) in documents.iter().enumerate() {
            let path = output_dir.join(self.document_name(n));
            fs::write(&path, xml)?;
            debug!(path = %path.display(), "wrote sitemap document");
            report.document_paths.push(path);
        }

        if documents.len() > 1 {
            let path = output_dir.join(self.index_name());
            fs::write(&path, self.index_xml(documents.len()))?;
            debug!(path = %path.display(), "wrote sitemap index");
            report.index_path = Some(path);
        }

        self.remove_stale(output_dir, documents.len(), report.index_path.is_some())?;

        info!(
            entries = report.entry_count,
            documents = report.document_paths.len(),
            index = report.index_path.is_some(),
            "sitemap written"
        );

        Ok(report)
    }

    fn document_name(&self, n: usize) -> String {
        format!("{}-{n}.xml", self.config.build.filename_base)
    }

    fn index_name(&self) -> String {
        format!("{}-index.xml", self.config.build.filename_base)
    }

    /// Normalize and deduplicate the raw page list.
    fn resolve_entries(&self, pages: &[PageEntry]) -> Result<Vec<UrlEntry>> {
        let base = Url::parse(self.config.base_url()).map_err(|e| SitemapError::Config {
            url: self.config.site.base_url.clone(),
            message: e.to_string(),
        })?;

        if base.host_str().is_none() {
            return Err(SitemapError::Config {
                url: self.config.site.base_url.clone(),
                message: "missing host".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(pages.len());

        for page in pages {
            if self.is_excluded(&page.path) {
                debug!(path = %page.path, "excluded from sitemap");
                continue;
            }

            if let Some(priority) = page.priority {
                if !(0.0..=1.0).contains(&priority) {
                    return Err(SitemapError::invalid_entry(
                        &page.path,
                        format!("priority {priority} outside 0.0..=1.0"),
                    ));
                }
            }

            let loc = resolve_loc(&base, &page.path)?;

            // First occurrence wins so the output stays deterministic.
            if !seen.insert(loc.clone()) {
                debug!(loc = %loc, "duplicate URL dropped");
                continue;
            }

            entries.push(UrlEntry {
                loc,
                lastmod: page.last_modified,
                changefreq: page.change_freq,
                priority: page.priority,
            });
        }

        Ok(entries)
    }

    fn is_excluded(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        self.config
            .sitemap
            .exclude
            .iter()
            .any(|prefix| path.starts_with(prefix.trim_start_matches('/')))
    }

    /// Serialize one chunk as a urlset document.
    fn urlset_xml(&self, entries: &[UrlEntry]) -> String {
        let mut xml = String::with_capacity(128 + entries.len() * 96);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in entries {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod.format("%Y-%m-%d").to_string());
                xml.push_str("</lastmod>\n");
            }
            if let Some(changefreq) = entry.changefreq {
                xml.push_str("    <changefreq>");
                xml.push_str(changefreq.as_str());
                xml.push_str("</changefreq>\n");
            }
            if let Some(priority) = entry.priority {
                xml.push_str(&format!("    <priority>{priority:.1}</priority>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Serialize the sitemapindex referencing `count` documents.
    ///
    /// Carries no timestamps so repeated builds stay byte-identical.
    fn index_xml(&self, count: usize) -> String {
        let mut xml = String::with_capacity(128 + count * 64);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<sitemapindex xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for n in 0..count {
            let loc = self.config.url_for(&self.document_name(n));
            xml.push_str("  <sitemap>\n    <loc>");
            xml.push_str(&escape_xml(&loc));
            xml.push_str("</loc>\n  </sitemap>\n");
        }

        xml.push_str("</sitemapindex>\n");
        xml
    }

    /// Remove documents left over from a previous, larger run.
    fn remove_stale(&self, output_dir: &Path, keep: usize, keep_index: bool) -> Result<()> {
        if !output_dir.is_dir() {
            return Ok(());
        }

        let base = &self.config.build.filename_base;
        for entry in fs::read_dir(output_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            let stale = if name == self.index_name() {
                !keep_index
            } else {
                matches!(chunk_number(name, base), Some(n) if n >= keep)
            };

            if stale {
                debug!(file = name, "removing stale sitemap file");
                fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }
}

/// Parse the chunk number out of a `{base}-{n}.xml` file name.
fn chunk_number(name: &str, base: &str) -> Option<usize> {
    name.strip_prefix(base)?
        .strip_prefix('-')?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Join a page path onto the base URL, normalizing separators.
fn resolve_loc(base: &Url, raw: &str) -> Result<String> {
    // Absolute URLs are allowed only when they already live on the site host.
    let path = if raw.contains("://") {
        let url = Url::parse(raw).map_err(|e| SitemapError::invalid_entry(raw, e.to_string()))?;
        if url.scheme() != base.scheme()
            || url.host_str() != base.host_str()
            || url.port_or_known_default() != base.port_or_known_default()
        {
            return Err(SitemapError::invalid_entry(
                raw,
                "absolute URL on a different host",
            ));
        }
        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        path
    } else {
        raw.to_string()
    };

    let mut clean = String::with_capacity(path.len() + 1);
    for segment in path.split('/') {
        match segment {
            // Duplicate separators and current-dir segments collapse.
            "" | "." => continue,
            ".." => return Err(SitemapError::invalid_entry(raw, "path traversal segment")),
            _ => {
                clean.push('/');
                clean.push_str(segment);
            }
        }
    }
    if clean.is_empty() || path.ends_with('/') {
        clean.push('/');
    }

    let loc = format!("{}{}", base.as_str().trim_end_matches('/'), clean);

    // Final well-formedness gate; percent-encodes anything unsafe.
    let parsed = Url::parse(&loc).map_err(|e| SitemapError::invalid_entry(raw, e.to_string()))?;
    Ok(parsed.into())
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
