//! Snapshots of per-source results and the state kept between checks
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Snapshot   │────▶│  Detector   │◀────│    Store    │
//! │  (current)  │     │  (compare)  │     │   (last)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │   Stores    │
//!                                         │(sqlite,json)│
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`]: `Snapshot` and `SourceResult`
//! - [`detector`]: Decides whether any source moved to a higher version
//! - [`store`]: `SnapshotStore` trait for loading and saving the last snapshot
//! - [`stores`]: SQLite and JSON file implementations

pub mod detector;
pub mod store;
pub mod stores;
pub mod types;

pub use detector::{ChangeReport, SourceComparison, compare, has_increased};
pub use store::SnapshotStore;
pub use types::{Snapshot, SourceResult};
