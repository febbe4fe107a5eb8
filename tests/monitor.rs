//! End-to-end monitor cycles against real snapshot stores

mod helper;

use std::sync::Arc;

use tempfile::TempDir;

use apk_watch::monitor::CycleOutcome;
use apk_watch::snapshot::SnapshotStore;
use apk_watch::snapshot::stores::{JsonFileSnapshotStore, SqliteSnapshotStore};
use apk_watch::version::Version;

use helper::fakes::{URL_32, URL_64};
use helper::{FakeFetcher, RecordingNotifier, create_test_cycle, download_page};

fn sqlite_store(temp_dir: &TempDir) -> Arc<SqliteSnapshotStore> {
    Arc::new(SqliteSnapshotStore::new(&temp_dir.path().join("snapshots.db")).unwrap())
}

fn beta_pages() -> FakeFetcher {
    FakeFetcher::new()
        .with_page(
            URL_64,
            download_page(&[
                "https://dl.example.com/PUBGM_BETA_3.4.0.18100_64.apk",
                "https://dl.example.com/PUBGM_BETA_3.5.0.18650_64.apk",
            ]),
        )
        .with_page(
            URL_32,
            download_page(&["https://dl.example.com/PUBGM_BETA_3.5.0.18650_32.apk"]),
        )
}

#[tokio::test]
async fn repeated_checks_without_changes_notify_and_save_once() {
    let temp_dir = TempDir::new().unwrap();
    let store = sqlite_store(&temp_dir);
    let notifier = Arc::new(RecordingNotifier::new());
    let cycle = create_test_cycle(Arc::new(beta_pages()), notifier.clone(), store.clone());

    let first = cycle.run_check().await;
    let second = cycle.run_check().await;

    assert_eq!(first.outcome, CycleOutcome::Updated);
    assert!(first.persisted);
    assert_eq!(second.outcome, CycleOutcome::Unchanged);
    assert!(!second.persisted);
    assert_eq!(notifier.messages().len(), 1);
    assert_eq!(store.history(10).unwrap().len(), 1);
}

#[tokio::test]
async fn overlapping_checks_bootstrap_only_once() {
    let temp_dir = TempDir::new().unwrap();
    let store = sqlite_store(&temp_dir);
    let notifier = Arc::new(RecordingNotifier::new());
    let cycle = create_test_cycle(Arc::new(beta_pages()), notifier.clone(), store.clone());

    let (first, second) = tokio::join!(cycle.run_check(), cycle.run_check());

    let mut outcomes = [first.outcome, second.outcome];
    outcomes.sort_by_key(|o| *o != CycleOutcome::Updated);
    assert_eq!(outcomes, [CycleOutcome::Updated, CycleOutcome::Unchanged]);
    assert_eq!(notifier.messages().len(), 1);
    assert_eq!(store.history(10).unwrap().len(), 1);
}

#[tokio::test]
async fn check_announces_new_release_after_page_changes() {
    let temp_dir = TempDir::new().unwrap();
    let store = sqlite_store(&temp_dir);
    let notifier = Arc::new(RecordingNotifier::new());
    let fetcher = Arc::new(beta_pages());
    let cycle = create_test_cycle(fetcher.clone(), notifier.clone(), store.clone());

    cycle.run_check().await;
    fetcher.set_page(
        URL_64,
        download_page(&["https://dl.example.com/PUBGM_BETA_3.6.0.19000_64.apk"]),
    );
    let report = cycle.run_check().await;

    assert_eq!(report.outcome, CycleOutcome::Updated);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].contains("64-bit latest version: 3.6.0.19000"));
    assert_eq!(
        store.load().unwrap().unwrap().version_of("64bit"),
        Some(Version::new(3, 6, 0, 19000))
    );
}

#[tokio::test]
async fn check_ignores_version_downgrade() {
    let temp_dir = TempDir::new().unwrap();
    let store = sqlite_store(&temp_dir);
    let notifier = Arc::new(RecordingNotifier::new());
    let fetcher = Arc::new(beta_pages());
    let cycle = create_test_cycle(fetcher.clone(), notifier.clone(), store.clone());

    cycle.run_check().await;
    fetcher.set_page(
        URL_64,
        download_page(&["https://dl.example.com/PUBGM_BETA_3.4.0.18100_64.apk"]),
    );
    let report = cycle.run_check().await;

    assert_eq!(report.outcome, CycleOutcome::Unchanged);
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn failed_source_does_not_block_update_of_the_other() {
    let temp_dir = TempDir::new().unwrap();
    let store = sqlite_store(&temp_dir);
    let notifier = Arc::new(RecordingNotifier::new());
    let fetcher = Arc::new(beta_pages());
    let cycle = create_test_cycle(fetcher.clone(), notifier.clone(), store.clone());

    cycle.run_check().await;
    fetcher.remove_page(URL_32);
    fetcher.set_page(
        URL_64,
        download_page(&["https://dl.example.com/PUBGM_BETA_3.6.0.19000_64.apk"]),
    );
    let report = cycle.run_check().await;

    assert_eq!(report.outcome, CycleOutcome::Updated);
    assert!(report.persisted);
    assert!(notifier.messages()[1].contains("32-bit: no download link found"));

    let saved = store.load().unwrap().unwrap();
    let saved_32 = saved.get("32bit").unwrap();
    assert!(saved_32.links.is_empty());
    assert_eq!(saved_32.highest_link, None);
}

#[tokio::test]
async fn rejected_notification_still_saves_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileSnapshotStore::new(
        temp_dir.path().join("link_history.json"),
    ));
    let notifier = Arc::new(RecordingNotifier::rejecting());
    let cycle = create_test_cycle(Arc::new(beta_pages()), notifier, store.clone());

    let report = cycle.run_check().await;

    assert!(!report.notified);
    assert!(report.persisted);
    assert!(store.load().unwrap().is_some());
}

#[tokio::test]
async fn dry_run_never_persists() {
    let temp_dir = TempDir::new().unwrap();
    let store = sqlite_store(&temp_dir);
    let notifier = Arc::new(RecordingNotifier::new());
    let cycle = create_test_cycle(Arc::new(beta_pages()), notifier.clone(), store.clone());

    let first = cycle.run_dry_run().await;
    let second = cycle.run_dry_run().await;

    assert_eq!(first.outcome, CycleOutcome::DryRun);
    assert!(second.notified);
    assert_eq!(notifier.messages().len(), 2);
    assert!(notifier.messages()[0].contains("link extraction test"));
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn corrupt_state_file_is_treated_as_first_run() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("link_history.json");
    std::fs::write(&path, "{ truncated").unwrap();
    let store = Arc::new(JsonFileSnapshotStore::new(path));
    let notifier = Arc::new(RecordingNotifier::new());
    let cycle = create_test_cycle(Arc::new(beta_pages()), notifier.clone(), store.clone());

    let report = cycle.run_check().await;

    assert_eq!(report.outcome, CycleOutcome::Updated);
    assert!(report.transcript.has_errors());
    assert_eq!(notifier.messages().len(), 1);
    assert!(store.load().unwrap().is_some());
}

#[tokio::test]
async fn legacy_history_file_is_compared_not_bootstrapped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("link_history.json");
    std::fs::write(
        &path,
        serde_json::json!({
            "beta": {
                "64bit": {
                    "links": ["https://dl.example.com/PUBGM_BETA_3.5.0.18650_64.apk"],
                    "highest_link": "https://dl.example.com/PUBGM_BETA_3.5.0.18650_64.apk",
                    "highest_version": "3.5.0.18650"
                },
                "32bit": {
                    "links": ["https://dl.example.com/PUBGM_BETA_3.5.0.18650_32.apk"],
                    "highest_link": "https://dl.example.com/PUBGM_BETA_3.5.0.18650_32.apk",
                    "highest_version": "3.5.0.18650"
                }
            }
        })
        .to_string(),
    )
    .unwrap();
    let store = Arc::new(JsonFileSnapshotStore::new(path));
    let notifier = Arc::new(RecordingNotifier::new());
    let cycle = create_test_cycle(Arc::new(beta_pages()), notifier.clone(), store);

    let report = cycle.run_check().await;

    assert_eq!(report.outcome, CycleOutcome::Unchanged);
    assert!(!report.transcript.has_errors());
    assert!(notifier.messages().is_empty());
}
