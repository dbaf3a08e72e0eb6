use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AuthMessage, CreateProductRequest, LoginRequest, LoginResponse, Notification, PricePoint,
    Product, ProductId, RegisterRequest, UpdateProductRequest, UserSettings,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError>;

    async fn create_product(&self, request: &CreateProductRequest) -> Result<Product, ApiError>;

    async fn update_product(
        &self,
        id: ProductId,
        request: &UpdateProductRequest,
    ) -> Result<Product, ApiError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;

    async fn get_price_history(&self, id: ProductId) -> Result<Vec<PricePoint>, ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthMessage, ApiError>;

    async fn reset_password(&self, email: &str) -> Result<AuthMessage, ApiError>;
}

#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError>;

    async fn mark_notification_read(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn get_settings(&self) -> Result<UserSettings, ApiError>;

    async fn update_settings(&self, settings: &UserSettings) -> Result<UserSettings, ApiError>;
}
