//! Telegram Bot API notifier

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::NotifyError;
use crate::notify::notifier::Notifier;

/// Default base URL for the Telegram Bot API
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Request body for `sendMessage`
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Envelope of every Bot API reply
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts messages to a chat or channel through a bot
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_base: &str,
        bot_token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text: message,
                disable_web_page_preview: false,
            })
            .send()
            .await?;

        let status = response.status();

        // The Bot API reports failures in the body, usually alongside a 4xx
        let body: ApiResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Telegram response (status {}): {}", status, e);
            NotifyError::InvalidResponse(e.to_string())
        })?;

        if body.ok {
            Ok(())
        } else {
            Err(NotifyError::Rejected(
                body.description
                    .unwrap_or_else(|| format!("status {}", status)),
            ))
        }
    }
}
