use axum::{extract::State, Json};

use crate::{error::Result, state::AppState};
use super::admin_dto::AdminOverviewResponse;

/// Overview of every watcher with notification statistics (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/watchers",
    tag = "admin",
    responses(
        (status = 200, description = "Watcher overview", body = AdminOverviewResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access disabled")
    ),
    security(
        ("admin_token" = [])
    )
)]
pub async fn get_admin_overview(
    State(state): State<AppState>,
) -> Result<Json<AdminOverviewResponse>> {
    let watchers = state.watcher_repository.find_summaries().await?;
    let total_slots = state.slot_repository.count_all().await?;

    Ok(Json(AdminOverviewResponse {
        total_watchers: watchers.len(),
        active_watchers: watchers.iter().filter(|w| w.is_active).count(),
        total_slots,
        watchers,
    }))
}
