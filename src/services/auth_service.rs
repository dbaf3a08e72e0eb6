use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::tracker_api::AuthApi;
use crate::models::{validate_email, AuthMessage, LoginForm, RegisterForm, User};
use crate::services::session::{AuthState, Session};

/// Sign-in / sign-up / sign-out on top of the shared [`Session`].
///
/// Failures are always returned as values; nothing here panics on a bad
/// response or an unreachable server.
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: Session,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, session: Session) -> Self {
        Self { api, session }
    }

    /// Restore the session from storage. The token is trusted as-is; the
    /// server will answer 401 if it is no longer valid.
    pub fn initialize(&self) -> AuthState {
        self.session.restore()
    }

    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.state().user().cloned()
    }

    /// Re-read storage before a protected screen is shown.
    pub fn check_session(&self) -> AuthState {
        self.session.sync()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError> {
        let request = LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
        .validate()?;

        let response = self.api.login(&request).await.map_err(|e| {
            warn!("Login failed for {}: {}", request.email, e);
            AppError::from(e)
        })?;

        self.session
            .establish(&response.access_token, &response.user)
            .map_err(|e| {
                error!("Failed to persist session: {}", e);
                e
            })?;

        info!("Signed in as {}", response.user.email);
        Ok(response.user)
    }

    /// Create an account. The caller still has to sign in afterwards.
    pub async fn sign_up(&self, form: RegisterForm) -> Result<AuthMessage, AppError> {
        let request = form.validate()?;
        let message = self.api.register(&request).await.map_err(|e| {
            warn!("Registration failed for {}: {}", request.email, e);
            AppError::from(e)
        })?;
        info!("Registered account {}", request.email);
        Ok(message)
    }

    pub fn sign_out(&self) {
        if let Err(e) = self.session.clear() {
            warn!("Session storage not fully cleared on sign-out: {}", e);
        }
        info!("Signed out");
    }

    pub async fn reset_password(&self, email: &str) -> Result<AuthMessage, AppError> {
        let email = validate_email(email)?;
        let message = self.api.reset_password(&email).await?;
        Ok(message)
    }
}
