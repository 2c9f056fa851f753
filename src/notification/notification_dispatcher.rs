use async_trait::async_trait;

use super::notification_models::{NotificationChannel, SlotAlert};
use super::senders::{email::EmailSender, telegram::TelegramSender, Notifier, SenderError};
use crate::state::MailjetConfig;

/// Routes each alert to the sender matching the watcher's channel.
#[derive(Clone)]
pub struct NotificationDispatcher {
    telegram: TelegramSender,
    email: EmailSender,
}

impl NotificationDispatcher {
    pub fn new(mailjet: Option<MailjetConfig>) -> Self {
        Self {
            telegram: TelegramSender::new(),
            email: EmailSender::new(mailjet),
        }
    }

    pub fn email_enabled(&self) -> bool {
        self.email.is_configured()
    }
}

#[async_trait]
impl Notifier for NotificationDispatcher {
    async fn notify(&self, channel: &NotificationChannel, alert: &SlotAlert) -> Result<(), SenderError> {
        match channel {
            NotificationChannel::Telegram { .. } => self.telegram.notify(channel, alert).await,
            NotificationChannel::Email { .. } => self.email.notify(channel, alert).await,
        }
    }
}
