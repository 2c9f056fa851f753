use async_trait::async_trait;
use thiserror::Error;

use super::notification_models::{NotificationChannel, SlotAlert};

pub mod email;
pub mod telegram;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
    #[error("Invalid configuration for sender: {0}")]
    InvalidConfiguration(String),
    #[error("Templating error: {0}")]
    TemplatingError(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Delivers slot alerts to a notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel: &NotificationChannel, alert: &SlotAlert) -> Result<(), SenderError>;
}
