//! Release announcements
//!
//! # Modules
//!
//! - [`notifier`]: `Notifier` trait, the seam for delivering a plain-text message
//! - [`telegram`]: Telegram Bot API implementation
//! - [`message`]: Rendering of update and test announcements from a snapshot

pub mod message;
pub mod notifier;
pub mod telegram;

pub use message::{MessageKind, render_message};
pub use notifier::Notifier;
pub use telegram::TelegramNotifier;
