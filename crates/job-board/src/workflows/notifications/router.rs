use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::{Notification, NotificationCenter};
use crate::error::AppError;

pub fn notification_router(center: Arc<NotificationCenter>) -> Router {
    Router::new()
        .route("/api/v1/notifications", get(list_handler))
        .route("/api/v1/notifications/read-all", post(read_all_handler))
        .route("/api/v1/notifications/:notification_id/read", post(read_handler))
        .with_state(center)
}

pub(crate) async fn list_handler(
    State(center): State<Arc<NotificationCenter>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let notifications = center.list()?;
    let unread_count = center.unread_count()?;
    Ok(Json(json!({
        "notifications": notifications,
        "unread_count": unread_count,
    })))
}

pub(crate) async fn read_handler(
    State(center): State<Arc<NotificationCenter>>,
    Path(notification_id): Path<u64>,
) -> Result<Json<Notification>, AppError> {
    Ok(Json(center.mark_as_read(notification_id)?))
}

pub(crate) async fn read_all_handler(
    State(center): State<Arc<NotificationCenter>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let marked = center.mark_all_as_read()?;
    Ok(Json(json!({ "marked": marked })))
}
