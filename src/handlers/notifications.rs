use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use super::{require_user, AppState};
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let notifications = state.repository.notifications_for_user(user.id);
    Ok(success(notifications, "Notifications fetched").into_response())
}

#[derive(Serialize)]
struct UnreadCountPayload {
    unread: usize,
}

pub async fn unread_count(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let payload = UnreadCountPayload {
        unread: state.repository.unread_count(user.id),
    };
    Ok(success(payload, "Unread count computed").into_response())
}

pub async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(notification_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let notification = state
        .repository
        .mark_notification_read(notification_id, user.id)?;
    Ok(success(notification, "Notification marked as read").into_response())
}
