use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::watcher_models::Watcher;
use crate::slot::NotifiedSlot;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWatcherRequest {
    #[validate(url, length(max = 500))]
    pub doctor_url: String,
    /// Exact dates as `YYYY-MM-DD`; a week range such as `0-3` is accepted too.
    #[serde(default)]
    pub target_dates: Vec<String>,
    /// Week range relative to the current week, e.g. `0-3`; weeks run from 0 to 52.
    pub week_range: Option<String>,
    pub notification_type: String,
    #[validate(length(max = 255))]
    pub telegram_bot_token: Option<String>,
    #[validate(length(max = 255))]
    pub telegram_chat_id: Option<String>,
    #[validate(length(max = 255))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WatcherDetailResponse {
    pub watcher: Watcher,
    pub notified_slots: Vec<NotifiedSlot>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotifiedSlotsResponse {
    pub slots: Vec<NotifiedSlot>,
}
