//! A single monitoring pass: fetch, scan, select, compare, announce, persist

use std::sync::Arc;

use chrono::{Local, Utc};
use futures::future::join_all;
use indexmap::IndexMap;
use tokio::sync::Mutex;

use crate::error::FetchError;
use crate::monitor::transcript::Transcript;
use crate::notify::message::{MessageKind, render_message};
use crate::notify::notifier::Notifier;
use crate::page::fetcher::PageFetcher;
use crate::page::scanner::scan_links;
use crate::snapshot::detector::{ChangeReport, compare};
use crate::snapshot::store::SnapshotStore;
use crate::snapshot::types::{Snapshot, SourceResult};
use crate::version::parser::parse_link_version;
use crate::version::types::Version;

/// A monitored page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub id: String,
    /// Name used in announcements and transcripts
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A source moved to a higher version, or no state existed yet
    Updated,
    /// Nothing moved forward; no announcement, no save
    Unchanged,
    /// Operator test run; announced unconditionally, never saved
    DryRun,
}

/// What a cycle did
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub snapshot: Snapshot,
    /// A notification was delivered
    pub notified: bool,
    /// The snapshot was written as the new last-known state
    pub persisted: bool,
    pub transcript: Transcript,
}

pub struct MonitorCycle {
    title: String,
    sources: Vec<SourceSpec>,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Option<Arc<dyn Notifier>>,
    store: Arc<dyn SnapshotStore>,
    /// Serializes load-compare-save so overlapping triggers cannot lose updates
    check_lock: Mutex<()>,
}

impl MonitorCycle {
    /// `notifier` is `None` when announcements are disabled.
    pub fn new(
        title: impl Into<String>,
        sources: Vec<SourceSpec>,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Option<Arc<dyn Notifier>>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            title: title.into(),
            sources,
            fetcher,
            notifier,
            store,
            check_lock: Mutex::new(()),
        }
    }

    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    /// Run a real check.
    ///
    /// Announces and saves only when some source moved to a higher version
    /// than the last saved snapshot, or when there is no saved snapshot.
    pub async fn run_check(&self) -> CycleReport {
        let _guard = self.check_lock.lock().await;
        let mut transcript = Transcript::new();
        transcript.info(format!("Starting {} version check", self.title));

        let current = self.collect_snapshot(&mut transcript).await;

        let last = self.store.load().unwrap_or_else(|e| {
            transcript.error(format!(
                "Failed to load last snapshot, treating this as the first run: {}",
                e
            ));
            None
        });

        let report = compare(&current, last.as_ref());
        match &report {
            ChangeReport::Bootstrap => transcript.info("No previous snapshot recorded"),
            ChangeReport::Compared(comparisons) => {
                for c in comparisons {
                    transcript.info(format!(
                        "{} version: current {} vs last {}",
                        self.label_of(&c.source),
                        c.current,
                        c.last
                    ));
                }
            }
        }

        if !report.has_increased() {
            let summary = self
                .sources
                .iter()
                .map(|s| {
                    format!(
                        "{}: {} vs {}",
                        s.label,
                        display_version(current.version_of(&s.id)),
                        display_version(last.as_ref().and_then(|l| l.version_of(&s.id)))
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            transcript.info(format!("Version not updated ({})", summary));

            return CycleReport {
                outcome: CycleOutcome::Unchanged,
                snapshot: current,
                notified: false,
                persisted: false,
                transcript,
            };
        }

        transcript.info("New version detected!");
        let notified = self
            .announce(MessageKind::Update, &current, &mut transcript)
            .await;

        let persisted = match self.store.save(&current) {
            Ok(()) => {
                transcript.info("New snapshot saved");
                true
            }
            Err(e) => {
                transcript.error(format!(
                    "Failed to save snapshot: {}. The next check will compare against \
                     stale state and may repeat or miss this update",
                    e
                ));
                false
            }
        };

        CycleReport {
            outcome: CycleOutcome::Updated,
            snapshot: current,
            notified,
            persisted,
            transcript,
        }
    }

    /// Fetch and announce the current links without comparing or saving.
    pub async fn run_dry_run(&self) -> CycleReport {
        let mut transcript = Transcript::new();
        transcript.info(format!("Starting {} link extraction test", self.title));

        let current = self.collect_snapshot(&mut transcript).await;
        transcript.info("Sending test notification");
        let notified = self
            .announce(MessageKind::Test, &current, &mut transcript)
            .await;
        transcript.info("Test finished");

        CycleReport {
            outcome: CycleOutcome::DryRun,
            snapshot: current,
            notified,
            persisted: false,
            transcript,
        }
    }

    /// Fetch every source concurrently and assemble results in configured order.
    ///
    /// A source that fails to fetch is recorded with no links and no highest
    /// link; the others are unaffected.
    async fn collect_snapshot(&self, transcript: &mut Transcript) -> Snapshot {
        let fetches = self.sources.iter().map(|s| self.fetcher.fetch(&s.url));
        let bodies: Vec<Result<Vec<u8>, FetchError>> = join_all(fetches).await;

        let mut results = IndexMap::new();
        for (source, body) in self.sources.iter().zip(bodies) {
            let result = match body {
                Ok(content) => {
                    let result = SourceResult::from_links(scan_links(&content));
                    if result.links.is_empty() {
                        transcript.warn(format!("{}: no download links found", source.label));
                    }
                    for link in &result.links {
                        if let Some(version) = parse_link_version(link) {
                            transcript
                                .info(format!("Parsed link: {} -> version {}", link, version));
                        }
                    }
                    transcript.info(format!(
                        "{}: found {} links, highest version: {}",
                        source.label,
                        result.links.len(),
                        display_version(result.highest_version)
                    ));
                    result
                }
                Err(e) => {
                    transcript.error(format!(
                        "{}: failed to fetch {}: {}",
                        source.label, source.url, e
                    ));
                    SourceResult::empty()
                }
            };
            results.insert(source.id.clone(), result);
        }

        Snapshot::new(Utc::now(), results)
    }

    /// Returns whether the message was delivered. Failures are logged only.
    async fn announce(
        &self,
        kind: MessageKind,
        snapshot: &Snapshot,
        transcript: &mut Transcript,
    ) -> bool {
        let Some(notifier) = &self.notifier else {
            transcript.warn("Notifications are disabled, skipping");
            return false;
        };

        let sources: Vec<(&str, &SourceResult)> = self
            .sources
            .iter()
            .filter_map(|s| snapshot.get(&s.id).map(|r| (s.label.as_str(), r)))
            .collect();
        let message = render_message(kind, &self.title, Local::now(), &sources);

        match notifier.notify(&message).await {
            Ok(()) => {
                transcript.info("Notification sent");
                true
            }
            Err(e) => {
                transcript.error(format!("Failed to send notification: {}", e));
                false
            }
        }
    }

    fn label_of<'a>(&'a self, source_id: &'a str) -> &'a str {
        self.sources
            .iter()
            .find(|s| s.id == source_id)
            .map_or(source_id, |s| s.label.as_str())
    }
}

fn display_version(version: Option<Version>) -> String {
    version.map_or_else(|| "none".to_string(), |v| v.to_string())
}
