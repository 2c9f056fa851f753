use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::notification::{NotificationChannel, NotificationType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Watcher {
    pub id: Uuid,
    pub doctor_name: String,
    pub doctor_url: String,
    pub doctor_code: String,
    pub target_dates: Vec<NaiveDate>,
    pub notification_type: String,
    #[serde(skip_serializing)]
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub last_check_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Watcher {
    /// Delivery channel built from the stored credentials, or `None` when the
    /// row is missing what its notification type requires.
    pub fn channel(&self) -> Option<NotificationChannel> {
        match self.notification_type.parse::<NotificationType>().ok()? {
            NotificationType::Telegram => Some(NotificationChannel::Telegram {
                bot_token: self.telegram_bot_token.clone()?,
                chat_id: self.telegram_chat_id.clone()?,
            }),
            NotificationType::Email => Some(NotificationChannel::Email {
                address: self.email.clone()?,
            }),
        }
    }
}

/// Validated input for inserting a watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatcher {
    pub doctor_name: String,
    pub doctor_url: String,
    pub doctor_code: String,
    pub target_dates: Vec<NaiveDate>,
    pub channel: NotificationChannel,
}

/// Per-watcher row of the admin overview.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct WatcherSummary {
    pub id: Uuid,
    pub doctor_name: String,
    pub doctor_url: String,
    pub notification_type: String,
    pub is_active: bool,
    pub target_dates_count: i32,
    pub slots_count: i64,
    pub last_check_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
