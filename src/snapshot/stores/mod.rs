//! Snapshot store implementations

pub mod json_file;
pub mod sqlite;

pub use json_file::JsonFileSnapshotStore;
pub use sqlite::SqliteSnapshotStore;
