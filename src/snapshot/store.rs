//! SnapshotStore trait for persisting the last recorded snapshot

#[cfg(test)]
use mockall::automock;

use crate::error::StoreError;
use crate::snapshot::types::Snapshot;

/// Trait for storing and retrieving the last-known snapshot
#[cfg_attr(test, automock)]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Load the most recently saved snapshot, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Record `snapshot` as the new last-known state
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}
