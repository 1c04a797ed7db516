//! Page entry types handed over by the external build pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a page is expected to change, per the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// Protocol string for the `<changefreq>` element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }

    /// Parse a protocol string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "always" => Some(Self::Always),
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// A single page emitted by the external build pipeline.
///
/// Entries keep the discovery order of the pipeline; that order is
/// preserved through deduplication and chunking so repeated builds stay
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Path relative to the site base URL (e.g., "/posts/hello/").
    pub path: String,

    /// Last modification time, if known (RFC 3339 on the wire).
    #[serde(default, rename = "lastmod", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Change frequency hint for crawlers.
    #[serde(default, rename = "changefreq", skip_serializing_if = "Option::is_none")]
    pub change_freq: Option<ChangeFreq>,

    /// Crawl priority in [0.0, 1.0].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f32>,
}

impl PageEntry {
    /// Create an entry carrying only a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            last_modified: None,
            change_freq: None,
            priority: None,
        }
    }
}
