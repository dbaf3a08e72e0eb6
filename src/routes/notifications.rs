use tracing::{error, info};

use crate::errors::AppError;
use crate::external::tracker_api::NotificationApi;
use crate::routes::require_dashboard;
use crate::state::AppState;
use crate::views::render_notifications;

pub async fn list(state: &AppState) -> Result<String, AppError> {
    info!("notifications - Listing notifications");
    require_dashboard(&state.auth_service())?;

    let notifications = state.api.get_notifications().await.map_err(|e| {
        error!("Failed to get notifications: {}", e);
        e
    })?;
    Ok(render_notifications(&notifications))
}

pub async fn mark_read(state: &AppState, id: i64) -> Result<String, AppError> {
    info!("notifications - Marking notification {} as read", id);
    require_dashboard(&state.auth_service())?;

    state.api.mark_notification_read(id).await.map_err(|e| {
        error!("Failed to mark notification {} as read: {}", id, e);
        e
    })?;
    Ok(format!("Notification {} marked as read.", id))
}
