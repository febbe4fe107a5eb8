//! Highest-version selection over a page's links

use tracing::debug;

use crate::version::parser::parse_link_version;
use crate::version::types::Version;

/// The winning link of a page together with the version it parsed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighestLink {
    pub link: String,
    pub version: Version,
}

/// Pick the highest-versioned link.
///
/// Links are visited in the order given; callers pass the scanner's
/// first-seen document order so results are reproducible. A candidate only
/// replaces the current best when it is strictly greater, which makes the
/// first-seen link win ties. Links without a version are skipped.
///
/// Returns `None` when no link parses.
pub fn select_highest<'a, I>(links: I) -> Option<HighestLink>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut best: Option<HighestLink> = None;

    for link in links {
        let Some(version) = parse_link_version(link) else {
            debug!("No version found in link: {}", link);
            continue;
        };
        debug!("Parsed link: {} -> version {}", link, version);

        let is_higher = best.as_ref().is_none_or(|b| version > b.version);
        if is_higher {
            best = Some(HighestLink {
                link: link.clone(),
                version,
            });
        }
    }

    best
}
