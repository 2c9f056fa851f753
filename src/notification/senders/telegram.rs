use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{Notifier, SenderError};
use crate::notification::notification_message::telegram_text;
use crate::notification::notification_models::{NotificationChannel, SlotAlert};

const TELEGRAM_API: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Pushes slot alerts through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramSender {
    client: Client,
    api_base: String,
}

impl Default for TelegramSender {
    fn default() -> Self {
        Self::new()
    }
}

impl TelegramSender {
    pub fn new() -> Self {
        Self::with_api_base(TELEGRAM_API)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }

    fn send_message_url(&self, bot_token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, bot_token)
    }
}

#[derive(Serialize)]
struct TelegramMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[async_trait]
impl Notifier for TelegramSender {
    async fn notify(&self, channel: &NotificationChannel, alert: &SlotAlert) -> Result<(), SenderError> {
        let (bot_token, chat_id) = match channel {
            NotificationChannel::Telegram { bot_token, chat_id } => (bot_token, chat_id),
            _ => {
                return Err(SenderError::InvalidConfiguration(
                    "Expected Telegram channel, but found a different type.".to_string(),
                ));
            }
        };

        if alert.is_empty() {
            return Ok(());
        }

        let text = telegram_text(alert);
        let payload = TelegramMessage {
            chat_id,
            text: &text,
            parse_mode: "MarkdownV2",
        };

        let response = self
            .client
            .post(self.send_message_url(bot_token))
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(SenderError::SendFailed(format!(
                "Telegram API returned non-success status: {status}. Body: {error_body}"
            )));
        }

        tracing::info!("Telegram notification sent with {} slot(s)", alert.slots.len());
        Ok(())
    }
}
