use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::slot::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Telegram,
    Email,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Telegram => "telegram",
            NotificationType::Email => "email",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(NotificationType::Telegram),
            "email" => Ok(NotificationType::Email),
            other => Err(format!("Unknown notification type: {}", other)),
        }
    }
}

/// Where a watcher's notifications are delivered, with the credentials
/// needed to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationChannel {
    Telegram { bot_token: String, chat_id: String },
    Email { address: String },
}

impl NotificationChannel {
    pub fn notification_type(&self) -> NotificationType {
        match self {
            NotificationChannel::Telegram { .. } => NotificationType::Telegram,
            NotificationChannel::Email { .. } => NotificationType::Email,
        }
    }
}

/// Newly opened slots for one doctor, delivered as a single message.
#[derive(Debug, Clone)]
pub struct SlotAlert {
    pub doctor_name: String,
    pub doctor_url: String,
    pub slots: Vec<Slot>,
}

impl SlotAlert {
    pub fn new(doctor_name: impl Into<String>, doctor_url: impl Into<String>, mut slots: Vec<Slot>) -> Self {
        slots.sort();
        Self {
            doctor_name: doctor_name.into(),
            doctor_url: doctor_url.into(),
            slots,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
