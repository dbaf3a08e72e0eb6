use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::external::http_client::TrackerApiClient;
use crate::services::auth_service::AuthService;
use crate::services::price_history_service::PriceHistoryService;
use crate::services::product_store::{FallbackPolicy, ProductStore};
use crate::services::session::Session;
use crate::store::{FileSessionStorage, SessionStorage};

/// Everything a screen handler needs, built once per process.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: Session,
    pub api: Arc<TrackerApiClient>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, AppError> {
        let session = Session::new(storage);
        let api = TrackerApiClient::new(&config, session.clone())?;
        Ok(Self {
            config,
            session,
            api: Arc::new(api),
        })
    }

    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let storage = Arc::new(FileSessionStorage::new(config.session_file.clone()));
        Self::new(config, storage)
    }

    pub fn policy(&self) -> FallbackPolicy {
        FallbackPolicy::from_flag(self.config.offline_fallback_enabled)
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    pub fn product_store(&self) -> ProductStore {
        ProductStore::new(self.api.clone(), self.policy())
    }

    pub fn price_history_service(&self) -> PriceHistoryService {
        PriceHistoryService::new(self.api.clone(), self.policy())
    }
}
