use chrono::{DateTime, Local};

use crate::snapshot::types::SourceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A newer release was detected
    Update,
    /// Operator-triggered dry run
    Test,
}

/// Render the announcement for a set of source results.
///
/// `sources` pairs each result with the label shown to readers.
pub fn render_message(
    kind: MessageKind,
    title: &str,
    checked_at: DateTime<Local>,
    sources: &[(&str, &SourceResult)],
) -> String {
    let heading = match kind {
        MessageKind::Update => "update detected",
        MessageKind::Test => "link extraction test",
    };
    let mut message = format!(
        "{title} {heading}\nChecked at: {}\n\n",
        checked_at.format("%Y-%m-%d %H:%M:%S")
    );

    for (label, result) in sources {
        let section = match (&result.highest_link, &result.highest_version) {
            (Some(link), Some(version)) => format!("{label} latest version: {version}\n{link}\n\n"),
            _ => format!("{label}: no download link found\n\n"),
        };
        message.push_str(&section);
    }

    message.push_str(match kind {
        MessageKind::Update => "Copy the link into a browser to download",
        MessageKind::Test => "This is a link extraction test result",
    });

    message
}
