use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

/// Absolute http(s) URL ending in `.apk`, stopping at whitespace, quotes and
/// angle brackets so attribute values and tag text both work.
static APK_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"<>]+\.apk"#).expect("valid regex"));

/// Extract every distinct `.apk` download link from raw page content.
///
/// Invalid UTF-8 is replaced rather than rejected. Links are returned in the
/// order they first appear in the document, without duplicates.
pub fn scan_links(content: &[u8]) -> IndexSet<String> {
    if content.is_empty() {
        return IndexSet::new();
    }

    let text = String::from_utf8_lossy(content);
    APK_LINK_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}
