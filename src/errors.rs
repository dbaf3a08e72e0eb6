use thiserror::Error;

use crate::external::tracker_api::ApiError;
use crate::models::{ProductId, ValidationErrors};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),
    #[error("Session storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Product {0} not found")]
    NotFound(ProductId),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Login required")]
    LoginRequired,
}

impl AppError {
    /// True when the server rejected the bearer token and the user has to sign
    /// in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            AppError::LoginRequired | AppError::Api(ApiError::Unauthorized)
        )
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        AppError::Validation(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Storage(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Storage(value.to_string())
    }
}
