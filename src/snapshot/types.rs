use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::version::selector::select_highest;
use crate::version::types::Version;

/// What one check found on one source page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResult {
    /// Every distinct download link, in document order
    pub links: Vec<String>,
    /// The link with the highest version, if any link carried one
    pub highest_link: Option<String>,
    pub highest_version: Option<Version>,
}

impl SourceResult {
    /// Builds a result from scanned links, selecting the highest one.
    pub fn from_links(links: IndexSet<String>) -> Self {
        let highest = select_highest(&links);
        Self {
            links: links.into_iter().collect(),
            highest_link: highest.as_ref().map(|h| h.link.clone()),
            highest_version: highest.map(|h| h.version),
        }
    }

    /// A source that could not be fetched: no links and no highest link.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-source results captured by a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    /// Keyed by source id, in configuration order
    pub sources: IndexMap<String, SourceResult>,
}

impl Snapshot {
    pub fn new(taken_at: DateTime<Utc>, sources: IndexMap<String, SourceResult>) -> Self {
        Self { taken_at, sources }
    }

    pub fn get(&self, source_id: &str) -> Option<&SourceResult> {
        self.sources.get(source_id)
    }

    /// Version recorded for a source, if both the source and a version exist.
    pub fn version_of(&self, source_id: &str) -> Option<Version> {
        self.get(source_id).and_then(|r| r.highest_version)
    }
}
