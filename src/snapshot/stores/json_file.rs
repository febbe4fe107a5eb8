use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::snapshot::store::SnapshotStore;
use crate::snapshot::types::{Snapshot, SourceResult};

/// History file written by the earlier monitor: results under a fixed
/// `beta` channel, without a timestamp.
#[derive(Debug, Deserialize)]
struct LegacyHistory {
    beta: IndexMap<String, SourceResult>,
}

impl LegacyHistory {
    fn into_snapshot(self, taken_at: DateTime<Utc>) -> Snapshot {
        let sources = self
            .beta
            .into_iter()
            .map(|(id, mut result)| {
                // A version without a link is the "0.0.0" placeholder for an empty page
                if result.highest_link.is_none() {
                    result.highest_version = None;
                }
                (id, result)
            })
            .collect();
        Snapshot::new(taken_at, sources)
    }
}

/// Keeps only the last snapshot, as pretty-printed JSON in a single file.
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_at(&self) -> DateTime<Utc> {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now())
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    /// A missing or blank file means nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Snapshot>(&content) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => match serde_json::from_str::<LegacyHistory>(&content) {
                Ok(legacy) => {
                    info!("Loaded legacy history file {:?}", self.path);
                    Ok(Some(legacy.into_snapshot(self.modified_at())))
                }
                Err(_) => Err(e.into()),
            },
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename so readers never see half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!("Saved snapshot to {:?}", self.path);
        Ok(())
    }
}
