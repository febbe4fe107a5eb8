//! Download page access
//!
//! # Modules
//!
//! - [`fetcher`]: `PageFetcher` trait, the seam for retrieving raw page bytes
//! - [`http`]: reqwest-backed fetcher presenting browser-like headers
//! - [`scanner`]: Extraction of `.apk` links from page content

pub mod fetcher;
pub mod http;
pub mod scanner;

pub use fetcher::PageFetcher;
pub use http::HttpPageFetcher;
pub use scanner::scan_links;
