//! Check orchestration
//!
//! # Modules
//!
//! - [`cycle`]: `MonitorCycle`, running a check or a dry run end to end
//! - [`transcript`]: Operator-facing log of what a cycle did

pub mod cycle;
pub mod transcript;

pub use cycle::{CycleOutcome, CycleReport, MonitorCycle, SourceSpec};
pub use transcript::{LogEntry, LogLevel, Transcript};
