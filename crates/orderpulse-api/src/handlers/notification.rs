//! Notification read-side handlers, all scoped to the caller.

use axum::Json;
use axum::extract::{Path, Query, State};

use orderpulse_core::types::ApiResponse;
use orderpulse_entity::notification::{Notification, NotificationStats};
use orderpulse_service::{ListQuery, NotificationListing};

use crate::dto::request::{CleanupQuery, MarkManyReadRequest};
use crate::dto::response::{CountResponse, DeletedResponse, ModifiedResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<NotificationListing>>, ApiError> {
    let listing = state.queries.list(&auth, &query).await?;
    Ok(Json(ApiResponse::with_message(
        "Notifications retrieved successfully",
        listing,
    )))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.queries.unread_count(&auth).await?;
    Ok(Json(ApiResponse::with_message(
        "Unread count retrieved successfully",
        CountResponse { count },
    )))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let notification = state.queries.mark_read(&auth, &id).await?;
    Ok(Json(ApiResponse::with_message(
        "Notification marked as read",
        notification,
    )))
}

/// PATCH /api/notifications/mark-many-read
pub async fn mark_many_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MarkManyReadRequest>,
) -> Result<Json<ApiResponse<ModifiedResponse>>, ApiError> {
    let modified_count = state
        .queries
        .mark_many_read(&auth, &req.notification_ids)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Notifications marked as read",
        ModifiedResponse { modified_count },
    )))
}

/// PATCH /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ModifiedResponse>>, ApiError> {
    let modified_count = state.queries.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::with_message(
        "All notifications marked as read",
        ModifiedResponse { modified_count },
    )))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.queries.delete(&auth, &id).await?;
    Ok(Json(ApiResponse::message("Notification deleted successfully")))
}

/// DELETE /api/notifications/read/all
pub async fn delete_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let deleted_count = state.queries.delete_all_read(&auth).await?;
    Ok(Json(ApiResponse::with_message(
        "All read notifications deleted",
        DeletedResponse { deleted_count },
    )))
}

/// GET /api/notifications/stats (staff)
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<NotificationStats>>, ApiError> {
    let stats = state.queries.stats(&auth).await?;
    Ok(Json(ApiResponse::with_message(
        "Notification statistics retrieved successfully",
        stats,
    )))
}

/// DELETE /api/notifications/cleanup?daysOld= (admin)
pub async fn cleanup(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CleanupQuery>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let deleted_count = state.queries.cleanup(&auth, query.days_old).await?;
    Ok(Json(ApiResponse::with_message(
        "Old notifications cleaned up successfully",
        DeletedResponse { deleted_count },
    )))
}
