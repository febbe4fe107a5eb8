//! Heuristic version extraction from download links
//!
//! Two patterns are tried in a fixed order:
//!
//! 1. `major.minor.patch`, optionally followed by one of `-`, `_`, `b`, `.`
//!    and a build number → `(major, minor, patch, build)`
//! 2. `major.minor`, optionally followed by the same separators and a build
//!    number → `(major, minor, 0, build)`
//!
//! The short form pads the *patch* slot and keeps the trailing number as the
//! build, so `2.9-7` reads as `2.9.0.7`. This is lossy for links that use a
//! `major.minor-patch` layout, but existing state was recorded with these
//! semantics and must keep comparing the same way.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::version::types::Version;

static FULL_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\.([0-9]+)\.([0-9]+)(?:[-_b.]([0-9]+))?").expect("valid regex")
});

static SHORT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\.([0-9]+)(?:[-_b.]([0-9]+))?").expect("valid regex")
});

/// Extract a version from a link, or `None` when the link carries none.
///
/// Never panics: a numeric component too large for `u64` makes the whole
/// link unparseable rather than failing the caller.
///
/// Examples:
/// - "x/2.9.1-5.apk" -> Version(2, 9, 1, 5)
/// - "x/2.9.apk" -> Version(2, 9, 0, 0)
/// - "x/nope.apk" -> None
pub fn parse_link_version(link: &str) -> Option<Version> {
    if let Some(caps) = FULL_VERSION_RE.captures(link) {
        return Some(Version::new(
            component(&caps, 1)?,
            component(&caps, 2)?,
            component(&caps, 3)?,
            optional_component(&caps, 4)?,
        ));
    }

    let caps = SHORT_VERSION_RE.captures(link)?;
    Some(Version::new(
        component(&caps, 1)?,
        component(&caps, 2)?,
        0,
        optional_component(&caps, 3)?,
    ))
}

fn component(caps: &Captures<'_>, index: usize) -> Option<u64> {
    caps.get(index)?.as_str().parse().ok()
}

fn optional_component(caps: &Captures<'_>, index: usize) -> Option<u64> {
    match caps.get(index) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}
