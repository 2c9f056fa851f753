use serde::Serialize;
use utoipa::ToSchema;

use crate::watcher::WatcherSummary;

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOverviewResponse {
    pub total_watchers: usize,
    pub active_watchers: usize,
    pub total_slots: i64,
    pub watchers: Vec<WatcherSummary>,
}
