use tracing::{error, info};

use crate::errors::AppError;
use crate::external::tracker_api::SettingsApi;
use crate::models::ValidationErrors;
use crate::routes::require_dashboard;
use crate::state::AppState;
use crate::views::render_settings;

pub async fn show(state: &AppState) -> Result<String, AppError> {
    info!("settings - Showing user settings");
    require_dashboard(&state.auth_service())?;

    let settings = state.api.get_settings().await.map_err(|e| {
        error!("Failed to get user settings: {}", e);
        e
    })?;
    Ok(render_settings(&settings))
}

/// Apply `key=value` pairs on top of the stored settings and save them.
pub async fn set(state: &AppState, changes: &[String]) -> Result<String, AppError> {
    info!("settings - Updating {} setting(s)", changes.len());
    require_dashboard(&state.auth_service())?;

    let mut settings = state.api.get_settings().await?;

    let mut errors = ValidationErrors::default();
    for change in changes {
        let applied = match change.split_once('=') {
            Some((key, value)) => settings.apply(key.trim(), value.trim()),
            None => Err(format!("expected key=value, got '{}'", change)),
        };
        if let Err(message) = applied {
            errors.push("settings", message);
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let saved = state.api.update_settings(&settings).await.map_err(|e| {
        error!("Failed to update user settings: {}", e);
        e
    })?;
    Ok(format!("Settings saved.\n{}", render_settings(&saved)))
}
