//! reqwest-backed page fetcher

use std::time::Duration;

use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::page::fetcher::PageFetcher;

/// Fetches pages with a fixed set of request headers and a per-request
/// timeout.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Creates a fetcher sending `headers` on every request.
    ///
    /// Header entries that are not valid HTTP names or values are skipped
    /// with a warning.
    pub fn new(headers: &IndexMap<String, String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(build_header_map(headers))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

fn build_header_map(headers: &IndexMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .ok()
            .zip(HeaderValue::from_str(value).ok());
        match parsed {
            Some((name, value)) => {
                map.insert(name, value);
            }
            None => warn!("Skipping invalid request header: {}", name),
        }
    }
    map
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Page returned status {}: {}", status, url);
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}
