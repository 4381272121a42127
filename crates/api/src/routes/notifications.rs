//! In-app notification routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use vertice_db::repositories::NotificationRepository;

use super::page_request;
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", post(mark_read))
}

/// Query for listing notifications.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
    /// Page number.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// GET `/notifications` - The caller's notifications, newest first.
async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NotificationRepository::new((*state.db).clone());
    let page = page_request(query.page, query.per_page);

    let notifications = repo
        .list_for_user(auth.user_id(), query.unread_only, &page)
        .await?;
    let unread = repo.unread_count(auth.user_id()).await?;

    Ok(Json(json!({
        "data": notifications.data,
        "meta": notifications.meta,
        "unread": unread,
    })))
}

/// POST `/notifications/{id}/read`
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NotificationRepository::new((*state.db).clone());
    let notification = repo.mark_read(auth.user_id(), id).await?;

    Ok(Json(notification))
}
