//! In-memory fetcher and notifier for driving monitor cycles in tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use apk_watch::error::{FetchError, NotifyError};
use apk_watch::monitor::{MonitorCycle, SourceSpec};
use apk_watch::notify::Notifier;
use apk_watch::page::PageFetcher;
use apk_watch::snapshot::SnapshotStore;

pub const URL_64: &str = "https://pages.example.com/download_android_1.html";
pub const URL_32: &str = "https://pages.example.com/download_android.html";

/// Serves fixed page bodies; unknown URLs fail with 404.
///
/// Every fetch yields to the runtime first, so concurrent cycles interleave.
#[derive(Default)]
pub struct FakeFetcher {
    pages: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, body: Vec<u8>) -> Self {
        self.set_page(url, body);
        self
    }

    pub fn set_page(&self, url: &str, body: Vec<u8>) {
        self.pages.lock().unwrap().insert(url.to_string(), body);
    }

    pub fn remove_page(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tokio::task::yield_now().await;
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(reqwest::StatusCode::NOT_FOUND))
    }
}

/// Records every delivered message; can be told to reject deliveries.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    reject: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        if self.reject {
            return Err(NotifyError::Rejected("Forbidden: bot was kicked".to_string()));
        }
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// HTML page linking each of `links`
pub fn download_page(links: &[&str]) -> Vec<u8> {
    let anchors: String = links
        .iter()
        .map(|l| format!("<li><a class=\"btn\" href=\"{l}\">Download</a></li>\n"))
        .collect();
    format!("<!DOCTYPE html><html><body><ul>\n{anchors}</ul></body></html>").into_bytes()
}

/// Cycle over the two default test sources
pub fn create_test_cycle(
    fetcher: Arc<FakeFetcher>,
    notifier: Arc<RecordingNotifier>,
    store: Arc<dyn SnapshotStore>,
) -> MonitorCycle {
    MonitorCycle::new(
        "Test BETA",
        vec![
            SourceSpec {
                id: "64bit".to_string(),
                label: "64-bit".to_string(),
                url: URL_64.to_string(),
            },
            SourceSpec {
                id: "32bit".to_string(),
                label: "32-bit".to_string(),
                url: URL_32.to_string(),
            },
        ],
        fetcher,
        Some(notifier as Arc<dyn Notifier>),
        store,
    )
}
