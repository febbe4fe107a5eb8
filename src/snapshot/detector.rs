//! Change detection between the current and the last recorded snapshot

use crate::snapshot::types::Snapshot;
use crate::version::types::Version;

/// Version comparison for a source present in both snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComparison {
    pub source: String,
    pub current: Version,
    pub last: Version,
}

impl SourceComparison {
    pub fn increased(&self) -> bool {
        self.current > self.last
    }
}

/// Outcome of comparing two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeReport {
    /// There is no previous snapshot to compare against
    Bootstrap,
    /// Sources whose version was known on both sides
    Compared(Vec<SourceComparison>),
}

impl ChangeReport {
    /// True on bootstrap or when any compared source strictly increased
    pub fn has_increased(&self) -> bool {
        match self {
            ChangeReport::Bootstrap => true,
            ChangeReport::Compared(comparisons) => comparisons.iter().any(|c| c.increased()),
        }
    }
}

/// Compare `current` against `last` source by source.
///
/// Only sources present in both snapshots with a version on both sides are
/// compared; every other source contributes no signal.
pub fn compare(current: &Snapshot, last: Option<&Snapshot>) -> ChangeReport {
    let Some(last) = last else {
        return ChangeReport::Bootstrap;
    };

    let comparisons = current
        .sources
        .iter()
        .filter_map(|(source, result)| {
            Some(SourceComparison {
                source: source.clone(),
                current: result.highest_version?,
                last: last.version_of(source)?,
            })
        })
        .collect();

    ChangeReport::Compared(comparisons)
}

/// Whether any tracked source moved to a strictly higher version.
pub fn has_increased(current: &Snapshot, last: Option<&Snapshot>) -> bool {
    compare(current, last).has_increased()
}
