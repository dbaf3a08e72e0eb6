use tracing::{error, info};

use crate::errors::AppError;
use crate::models::RegisterForm;
use crate::routes::{navigate, Navigation, Route};
use crate::state::AppState;
use crate::views::render_welcome;

fn already_signed_in(state: &AppState) -> String {
    let name = state
        .session
        .state()
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    format!(
        "Already signed in as {}. Run `pricewatch logout` to switch accounts.",
        name
    )
}

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<String, AppError> {
    info!("login - Signing in {}", email);
    let auth = state.auth_service();
    if let Navigation::Redirect(Route::Dashboard) = navigate(&auth, Route::Login) {
        return Ok(already_signed_in(state));
    }

    let user = auth.sign_in(email, password).await.map_err(|e| {
        error!("Sign-in failed for {}: {}", email, e);
        e
    })?;
    Ok(format!("Signed in as {}.", user.display_name()))
}

pub async fn register(state: &AppState, form: RegisterForm) -> Result<String, AppError> {
    info!("register - Creating account {}", form.email);
    let auth = state.auth_service();
    if let Navigation::Redirect(Route::Dashboard) = navigate(&auth, Route::Register) {
        return Ok(already_signed_in(state));
    }

    let email = form.email.clone();
    let message = auth.sign_up(form).await.map_err(|e| {
        error!("Registration failed for {}: {}", email, e);
        e
    })?;

    let mut out = message
        .message
        .unwrap_or_else(|| "Account created.".to_string());
    out.push_str("\nRun `pricewatch login` to sign in.");
    Ok(out)
}

pub fn logout(state: &AppState) -> String {
    info!("logout - Clearing session");
    let auth = state.auth_service();
    auth.initialize();
    auth.sign_out();
    "Signed out.".to_string()
}

pub async fn reset_password(state: &AppState, email: &str) -> Result<String, AppError> {
    info!("reset-password - Requesting reset for {}", email);
    let message = state.auth_service().reset_password(email).await?;
    Ok(message
        .message
        .unwrap_or_else(|| format!("If {} has an account, a reset link is on its way.", email)))
}

/// The public home screen: greets the signed-in user, or explains how to sign in.
pub fn whoami(state: &AppState) -> String {
    let auth = state.auth_service();
    match navigate(&auth, Route::Home) {
        Navigation::Render(_) => match auth.current_user() {
            Some(user) => format!("{}\nSigned in as {}.", render_welcome(Some(&user)), user.email),
            None => "Not signed in. Run `pricewatch login` or `pricewatch register`.".to_string(),
        },
        _ => "Not signed in.".to_string(),
    }
}
