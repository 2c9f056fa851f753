use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Admin endpoints require `Authorization: Bearer <ADMIN_TOKEN>`. Without a
/// configured token they are disabled altogether.
pub async fn admin_authorization(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let expected = state
        .config
        .admin_token
        .as_deref()
        .ok_or_else(|| AppError::Forbidden("Admin access is disabled".to_string()))?;

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing admin token".to_string()))?;

    if token != expected {
        return Err(AppError::Unauthorized("Invalid admin token".to_string()));
    }

    Ok(next.run(request).await)
}
