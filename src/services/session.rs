use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::User;
use crate::store::session_storage::{SessionStorage, TOKEN_KEY, USER_KEY};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Authenticated(User),
    /// `login_required` is set when a previously valid session was revoked
    /// (401 from the API, or the stored token disappeared).
    Anonymous { login_required: bool },
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Sole owner of the bearer token lifecycle.
///
/// The API client reads the token and expires the session on 401, the auth
/// service establishes and clears it. Both go through this type, and state
/// changes are published on a watch channel.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<AuthState>,
}

impl Session {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            inner: Arc::new(SessionInner { storage, state }),
        }
    }

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    fn publish(&self, state: AuthState) -> AuthState {
        self.inner.state.send_replace(state.clone());
        state
    }

    /// Current bearer token, read from storage on every call.
    pub fn token(&self) -> Option<String> {
        match self.inner.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read auth token from session storage: {}", e);
                None
            }
        }
    }

    pub fn stored_user(&self) -> Result<Option<User>, AppError> {
        match self.inner.storage.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Persist a fresh token and user, and mark the session authenticated.
    pub fn establish(&self, token: &str, user: &User) -> Result<(), AppError> {
        self.inner.storage.set(TOKEN_KEY, token)?;
        self.inner.storage.set(USER_KEY, &serde_json::to_string(user)?)?;
        self.publish(AuthState::Authenticated(user.clone()));
        Ok(())
    }

    /// Rebuild the state from storage without contacting the server.
    pub fn restore(&self) -> AuthState {
        let token = match self.inner.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Session storage unreadable, starting signed out: {}", e);
                return self.publish(AuthState::Anonymous { login_required: false });
            }
        };

        if token.is_none() {
            return self.publish(AuthState::Anonymous { login_required: false });
        }

        match self.stored_user() {
            Ok(Some(user)) => self.publish(AuthState::Authenticated(user)),
            Ok(None) => {
                warn!("Auth token present without a cached user, discarding session");
                self.discard();
                self.publish(AuthState::Anonymous { login_required: false })
            }
            Err(e) => {
                warn!("Cached user is unreadable, discarding session: {}", e);
                self.discard();
                self.publish(AuthState::Anonymous { login_required: false })
            }
        }
    }

    /// Re-check storage against the in-memory state. A session whose token
    /// vanished since it was established becomes anonymous and asks for login.
    pub fn sync(&self) -> AuthState {
        match self.state() {
            AuthState::Loading => self.restore(),
            AuthState::Authenticated(_) => {
                let user_present = matches!(self.stored_user(), Ok(Some(_)));
                if self.token().is_some() && user_present {
                    self.state()
                } else {
                    info!("Stored session no longer present, login required");
                    self.discard();
                    self.publish(AuthState::Anonymous { login_required: true })
                }
            }
            anonymous @ AuthState::Anonymous { .. } => {
                if self.token().is_some() {
                    self.restore()
                } else {
                    anonymous
                }
            }
        }
    }

    /// Explicit sign-out.
    pub fn clear(&self) -> Result<(), AppError> {
        let token = self.inner.storage.remove(TOKEN_KEY);
        let user = self.inner.storage.remove(USER_KEY);
        self.publish(AuthState::Anonymous { login_required: false });
        token.and(user)
    }

    /// The server rejected the token.
    pub fn expire(&self) {
        warn!("Session rejected by the API, login required");
        self.discard();
        self.publish(AuthState::Anonymous { login_required: true });
    }

    fn discard(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.inner.storage.remove(key) {
                warn!("Failed to remove {} from session storage: {}", key, e);
            }
        }
    }
}
