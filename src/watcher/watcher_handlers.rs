use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{
    watcher_dto::{
        CreateWatcherRequest, NotifiedSlotsResponse, SetActiveRequest, WatcherDetailResponse,
    },
    watcher_models::Watcher,
};
use crate::{
    error::Result,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

/// Create a watcher and start checking it immediately
#[utoipa::path(
    post,
    path = "/api/watchers",
    request_body = CreateWatcherRequest,
    responses(
        (status = 201, description = "Watcher created", body = Watcher),
        (status = 400, description = "Invalid input")
    ),
    tag = "watchers"
)]
pub async fn create_watcher(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateWatcherRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let watcher = state.watcher_service.create_watcher(payload).await?;

    Ok((StatusCode::CREATED, Json(watcher)))
}

/// Get a watcher with its most recent notified slots
#[utoipa::path(
    get,
    path = "/api/watchers/{id}",
    params(
        ("id" = Uuid, Path, description = "Watcher ID")
    ),
    responses(
        (status = 200, description = "Watcher found", body = WatcherDetailResponse),
        (status = 404, description = "Watcher not found")
    ),
    tag = "watchers"
)]
pub async fn get_watcher(
    State(state): State<AppState>,
    ApiPath(watcher_id): ApiPath<Uuid>,
) -> Result<Json<WatcherDetailResponse>> {
    let detail = state.watcher_service.get_watcher_detail(watcher_id).await?;
    Ok(Json(detail))
}

/// Flip a watcher's active flag
#[utoipa::path(
    patch,
    path = "/api/watchers/{id}/toggle",
    params(
        ("id" = Uuid, Path, description = "Watcher ID")
    ),
    responses(
        (status = 200, description = "Watcher toggled", body = Watcher),
        (status = 404, description = "Watcher not found")
    ),
    tag = "watchers"
)]
pub async fn toggle_watcher(
    State(state): State<AppState>,
    ApiPath(watcher_id): ApiPath<Uuid>,
) -> Result<Json<Watcher>> {
    let watcher = state.watcher_service.toggle_watcher(watcher_id).await?;
    Ok(Json(watcher))
}

/// Set a watcher's active flag
#[utoipa::path(
    put,
    path = "/api/watchers/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Watcher ID")
    ),
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "Watcher updated", body = Watcher),
        (status = 404, description = "Watcher not found")
    ),
    tag = "watchers"
)]
pub async fn set_watcher_active(
    State(state): State<AppState>,
    ApiPath(watcher_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<SetActiveRequest>,
) -> Result<Json<Watcher>> {
    let watcher = state
        .watcher_service
        .set_active(watcher_id, payload.is_active)
        .await?;
    Ok(Json(watcher))
}

/// Delete a watcher and its notified slots
#[utoipa::path(
    delete,
    path = "/api/watchers/{id}",
    params(
        ("id" = Uuid, Path, description = "Watcher ID")
    ),
    responses(
        (status = 204, description = "Watcher deleted"),
        (status = 404, description = "Watcher not found")
    ),
    tag = "watchers"
)]
pub async fn delete_watcher(
    State(state): State<AppState>,
    ApiPath(watcher_id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.watcher_service.delete_watcher(watcher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List every slot a watcher has been notified about, newest first
#[utoipa::path(
    get,
    path = "/api/watchers/{id}/slots",
    params(
        ("id" = Uuid, Path, description = "Watcher ID")
    ),
    responses(
        (status = 200, description = "Notified slots", body = NotifiedSlotsResponse),
        (status = 404, description = "Watcher not found")
    ),
    tag = "watchers"
)]
pub async fn get_notified_slots(
    State(state): State<AppState>,
    ApiPath(watcher_id): ApiPath<Uuid>,
) -> Result<Json<NotifiedSlotsResponse>> {
    let slots = state.watcher_service.list_notified_slots(watcher_id).await?;
    Ok(Json(NotifiedSlotsResponse { slots }))
}
