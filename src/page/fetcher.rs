//! PageFetcher trait for retrieving download page content

#[cfg(test)]
use mockall::automock;

use crate::error::FetchError;

/// Trait for fetching the raw bytes of a monitored page
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url`
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The response body, possibly empty
    /// * `Err(FetchError)` - Network failure, timeout, or non-2xx status
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
