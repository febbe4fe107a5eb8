use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timestamp = self.timestamp.format("%Y-%m-%d %H:%M:%S");
        match self.level {
            LogLevel::Error => write!(f, "[{}] ERROR: {}", timestamp, self.message),
            LogLevel::Info | LogLevel::Warn => write!(f, "[{}] {}", timestamp, self.message),
        }
    }
}

/// Ordered record of what a cycle did, returned to whoever triggered it.
///
/// Every entry is mirrored to `tracing` so the process log and the operator
/// transcript never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    entries: Vec<LogEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.push(LogLevel::Error, message);
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            level,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == LogLevel::Error)
    }

    /// One line per entry, `[YYYY-MM-DD HH:MM:SS] message`
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{e}\n"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prefixes_errors_and_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.info("Starting check");
        transcript.error("Failed to fetch 64bit");

        let rendered = transcript.render();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] Starting check"));
        assert!(lines[1].ends_with("] ERROR: Failed to fetch 64bit"));
        assert!(lines[0].starts_with('['));
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let mut transcript = Transcript::new();
        transcript.warn("32bit: no links found");
        assert!(!transcript.has_errors());

        transcript.error("save failed");
        assert!(transcript.has_errors());
    }

    #[test]
    fn empty_transcript_renders_empty_string() {
        assert_eq!(Transcript::new().render(), "");
    }
}
