//! Screens of the dashboard and the rules for reaching them.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod settings;

use crate::errors::AppError;
use crate::services::auth_service::AuthService;
use crate::services::session::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Only meaningful while signed out (login, register).
    GuestOnly,
    Protected,
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Home => Access::Public,
            Route::Login | Route::Register => Access::GuestOnly,
            Route::Dashboard => Access::Protected,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    Wait,
}

pub fn guard(route: Route, state: &AuthState) -> Navigation {
    match (route.access(), state) {
        (_, AuthState::Loading) => Navigation::Wait,
        (Access::Protected, AuthState::Anonymous { .. }) => Navigation::Redirect(Route::Login),
        (Access::GuestOnly, AuthState::Authenticated(_)) => Navigation::Redirect(Route::Dashboard),
        _ => Navigation::Render(route),
    }
}

/// Resolve `route` against the session as it is in storage right now.
pub fn navigate(auth: &AuthService, route: Route) -> Navigation {
    guard(route, &auth.check_session())
}

pub(crate) fn require_dashboard(auth: &AuthService) -> Result<(), AppError> {
    match navigate(auth, Route::Dashboard) {
        Navigation::Render(_) => Ok(()),
        _ => Err(AppError::LoginRequired),
    }
}
