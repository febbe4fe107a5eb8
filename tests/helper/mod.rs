//! Shared test utilities

#![allow(dead_code)]

pub mod fakes;

pub use fakes::{FakeFetcher, RecordingNotifier, create_test_cycle, download_page};
