use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    models::{Notification, ReadAllResponse},
};

/// get_notifications
///
/// [Authenticated Route] The caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/notifications",
    responses((status = 200, description = "My notifications", body = [Notification]))
)]
pub async fn get_notifications(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<Notification>> {
    Json(state.repo.list_notifications(id).await)
}

/// mark_notification_read
///
/// [Authenticated Route] Someone else's notification is answered with 404.
#[utoipa::path(
    patch,
    path = "/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses((status = 204, description = "Marked read"), (status = 404, description = "Not Found"))
)]
pub async fn mark_notification_read(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.repo.mark_notification_read(id, user_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    responses((status = 200, description = "Count of notifications marked read", body = ReadAllResponse))
)]
pub async fn mark_all_notifications_read(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<ReadAllResponse> {
    let updated = state.repo.mark_all_notifications_read(id).await;
    Json(ReadAllResponse { updated })
}
