pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod page;
pub mod server;
pub mod snapshot;
pub mod version;
