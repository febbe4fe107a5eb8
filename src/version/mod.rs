//! Version inference for download links
//!
//! Download pages never publish a version manifest; the only version
//! information available is whatever the artifact URL happens to embed.
//! This module turns such URLs into comparable [`Version`] values and picks
//! the newest link out of a page.
//!
//! # Modules
//!
//! - [`types`]: The four-component [`Version`] value and its ordering
//! - [`parser`]: Heuristic extraction of a version from a link
//! - [`selector`]: Reduction of a link set to its highest-versioned link

pub mod parser;
pub mod selector;
pub mod types;

pub use parser::parse_link_version;
pub use selector::{HighestLink, select_highest};
pub use types::Version;
