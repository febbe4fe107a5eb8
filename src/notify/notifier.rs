//! Notifier trait for delivering announcements

#[cfg(test)]
use mockall::automock;

use crate::error::NotifyError;

/// Trait for delivering a plain-text message to subscribers
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message`
    ///
    /// # Returns
    /// * `Ok(())` - The message was accepted by the transport
    /// * `Err(NotifyError)` - Transport failure or the receiver rejected it
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}
