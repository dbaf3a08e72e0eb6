use tracing::{info, warn};

use crate::state::AppState;

/// Reachability of the tracker API. Never fails; the answer is the output.
pub async fn health(state: &AppState) -> String {
    info!("health - Checking {}", state.api.base_url());
    match state.api.health_check().await {
        Ok(body) if body.trim().is_empty() => format!("{}: OK", state.api.base_url()),
        Ok(body) => format!("{}: OK ({})", state.api.base_url(), body.trim()),
        Err(e) => {
            warn!("Health check failed: {}", e);
            format!("{}: unreachable ({})", state.api.base_url(), e)
        }
    }
}
