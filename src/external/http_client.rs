use std::time::Duration;

use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::external::tracker_api::{ApiError, AuthApi, NotificationApi, ProductApi, SettingsApi};
use crate::models::{
    AuthMessage, CreateProductRequest, LoginRequest, LoginResponse, Notification, PricePoint,
    Product, ProductId, RegisterRequest, ResetPasswordRequest, UpdateProductRequest, UserSettings,
};
use crate::services::session::Session;

/// Error body shapes the tracker API is known to return.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiErrorBody {
    fn into_message(self) -> Option<String> {
        let detail = self.detail.map(|d| match d {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        detail.or(self.message).or(self.error)
    }
}

/// REST client for the price-tracker API.
///
/// Every request carries the session's bearer token when there is one. A 401
/// response expires the session before the error is handed back, so callers
/// only have to route the user to the login screen.
#[derive(Clone)]
pub struct TrackerApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl TrackerApiClient {
    pub fn new(config: &AppConfig, session: Session) -> Result<Self, ApiError> {
        Self::with_base_url(
            config.api_base_url.as_str(),
            Duration::from_secs(config.request_timeout_secs),
            session,
        )
    }

    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        session: Session,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("[TrackerApi] {} {}", method, url);

        let mut builder = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        builder
    }

    /// Send a request and return the raw body of a successful response.
    ///
    /// A 401 only expires the session when the request carried the bearer
    /// token. Without one (e.g. a login with bad credentials) it is an ordinary
    /// error whose message comes from the body.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build request: {}", e)))?;
        let sent_token = request.headers().contains_key(AUTHORIZATION);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response: {}", e)))?;

        if status == StatusCode::UNAUTHORIZED && sent_token {
            self.session.expire();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(ApiErrorBody::into_message)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            warn!("[TrackerApi] request failed with {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.execute(builder).await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(ApiError::EmptyResponse);
        }

        serde_json::from_str(trimmed).map_err(|e| {
            ApiError::Parse(format!(
                "{} - {}",
                e,
                trimmed.chars().take(200).collect::<String>()
            ))
        })
    }

    async fn empty(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.execute(builder).await.map(|_| ())
    }

    pub async fn health_check(&self) -> Result<String, ApiError> {
        self.execute(self.request(Method::GET, "/health")).await
    }
}

#[async_trait]
impl ProductApi for TrackerApiClient {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.json(self.request(Method::GET, "/products/")).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.json(self.request(Method::GET, &format!("/products/{}", id)))
            .await
    }

    async fn create_product(&self, request: &CreateProductRequest) -> Result<Product, ApiError> {
        self.json(self.request(Method::POST, "/products/").json(request))
            .await
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: &UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        self.json(
            self.request(Method::PUT, &format!("/products/{}", id))
                .json(request),
        )
        .await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.empty(self.request(Method::DELETE, &format!("/products/{}", id)))
            .await
    }

    async fn get_price_history(&self, id: ProductId) -> Result<Vec<PricePoint>, ApiError> {
        self.json(self.request(Method::GET, &format!("/products/{}/price-history", id)))
            .await
    }
}

#[async_trait]
impl AuthApi for TrackerApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.json(self.request(Method::POST, "/auth/login").json(request))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthMessage, ApiError> {
        let body = self
            .execute(self.request(Method::POST, "/auth/register").json(request))
            .await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn reset_password(&self, email: &str) -> Result<AuthMessage, ApiError> {
        let request = ResetPasswordRequest {
            email: email.to_string(),
        };
        let body = self
            .execute(self.request(Method::POST, "/auth/reset-password").json(&request))
            .await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

#[async_trait]
impl NotificationApi for TrackerApiClient {
    async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.json(self.request(Method::GET, "/notifications/")).await
    }

    async fn mark_notification_read(&self, id: i64) -> Result<(), ApiError> {
        self.empty(self.request(Method::PUT, &format!("/notifications/{}/read", id)))
            .await
    }
}

#[async_trait]
impl SettingsApi for TrackerApiClient {
    async fn get_settings(&self) -> Result<UserSettings, ApiError> {
        self.json(self.request(Method::GET, "/user/settings")).await
    }

    async fn update_settings(&self, settings: &UserSettings) -> Result<UserSettings, ApiError> {
        self.json(self.request(Method::PUT, "/user/settings").json(settings))
            .await
    }
}
