use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::{Notifier, SenderError};
use crate::notification::notification_message::{email_html, email_subject, email_text};
use crate::notification::notification_models::{NotificationChannel, SlotAlert};
use crate::state::MailjetConfig;

const MAILJET_SEND_URL: &str = "https://api.mailjet.com/v3.1/send";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends slot alerts as email through the Mailjet v3.1 send API.
#[derive(Clone)]
pub struct EmailSender {
    client: Client,
    config: Option<MailjetConfig>,
}

impl EmailSender {
    pub fn new(config: Option<MailjetConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn payload(
        config: &MailjetConfig,
        address: &str,
        alert: &SlotAlert,
    ) -> Result<serde_json::Value, SenderError> {
        let text = email_text(alert).map_err(|e| SenderError::TemplatingError(e.to_string()))?;
        let html = email_html(alert).map_err(|e| SenderError::TemplatingError(e.to_string()))?;

        Ok(json!({
            "Messages": [{
                "From": { "Email": config.sender_email, "Name": config.sender_name },
                "To": [{ "Email": address }],
                "Subject": email_subject(alert),
                "TextPart": text,
                "HTMLPart": html,
            }]
        }))
    }
}

#[async_trait]
impl Notifier for EmailSender {
    async fn notify(&self, channel: &NotificationChannel, alert: &SlotAlert) -> Result<(), SenderError> {
        let address = match channel {
            NotificationChannel::Email { address } => address,
            _ => {
                return Err(SenderError::InvalidConfiguration(
                    "Expected email channel, but found a different type.".to_string(),
                ));
            }
        };

        if alert.is_empty() {
            return Ok(());
        }

        let config = self.config.as_ref().ok_or_else(|| {
            SenderError::InvalidConfiguration("Mailjet is not configured".to_string())
        })?;

        let payload = Self::payload(config, address, alert)?;

        let response = self
            .client
            .post(MAILJET_SEND_URL)
            .timeout(SEND_TIMEOUT)
            .basic_auth(&config.api_key, Some(&config.secret_key))
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
                "Mailjet returned non-success status: {status}. Body: {error_body}"
            )));
        }

        tracing::info!("Email sent to {} with {} slot(s)", address, alert.slots.len());
        Ok(())
    }
}
