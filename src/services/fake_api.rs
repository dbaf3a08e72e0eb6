use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::external::tracker_api::{ApiError, AuthApi, ProductApi};
use crate::models::{
    AuthMessage, CreateProductRequest, LoginRequest, LoginResponse, PricePoint, Product,
    ProductId, RegisterRequest, UpdateProductRequest, User,
};

pub(crate) const VALID_PASSWORD: &str = "secret1";

/// In-process stand-in for the tracker API.
pub(crate) struct FakeTrackerApi {
    online: bool,
    unauthorized: bool,
    products: Mutex<Vec<Product>>,
    history: Mutex<Vec<PricePoint>>,
    history_delay: Option<Duration>,
    next_id: AtomicI64,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeTrackerApi {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        Self {
            online: true,
            unauthorized: false,
            products: Mutex::new(products),
            history: Mutex::new(Vec::new()),
            history_delay: None,
            next_id: AtomicI64::new(1000),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn offline() -> Self {
        Self {
            online: false,
            ..Self::with_products(Vec::new())
        }
    }

    /// Answers every call as if the bearer token had been revoked.
    pub(crate) fn rejecting_token() -> Self {
        Self {
            unauthorized: true,
            ..Self::with_products(Vec::new())
        }
    }

    pub(crate) fn with_history(self, history: Vec<PricePoint>) -> Self {
        *self.history.lock() = history;
        self
    }

    pub(crate) fn with_history_delay(mut self, delay: Duration) -> Self {
        self.history_delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), ApiError> {
        self.calls.lock().push(call);
        if self.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        if self.online {
            Ok(())
        } else {
            Err(ApiError::Network("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl ProductApi for FakeTrackerApi {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record("get_products")?;
        Ok(self.products.lock().clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.record("get_product")?;
        self.products
            .lock()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: "Product not found".to_string(),
            })
    }

    async fn create_product(&self, request: &CreateProductRequest) -> Result<Product, ApiError> {
        self.record("create_product")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let product = Product::from_create_request(id, request.clone());
        self.products.lock().insert(0, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: &UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        self.record("update_product")?;
        let mut products = self.products.lock();
        let entry = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::Status {
                status: 404,
                message: "Product not found".to_string(),
            })?;
        *entry = entry.merged_with(request);
        Ok(entry.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.record("delete_product")?;
        self.products.lock().retain(|p| p.id != id);
        Ok(())
    }

    async fn get_price_history(&self, _id: ProductId) -> Result<Vec<PricePoint>, ApiError> {
        if let Some(delay) = self.history_delay {
            tokio::time::sleep(delay).await;
        }
        self.record("get_price_history")?;
        Ok(self.history.lock().clone())
    }
}

#[async_trait]
impl AuthApi for FakeTrackerApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record("login")?;
        if request.password != VALID_PASSWORD {
            return Err(ApiError::Status {
                status: 400,
                message: "Invalid credentials".to_string(),
            });
        }
        Ok(LoginResponse {
            access_token: format!("token-for-{}", request.email),
            token_type: Some("bearer".to_string()),
            user: User {
                email: request.email.clone(),
                full_name: Some("Test User".to_string()),
            },
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthMessage, ApiError> {
        self.record("register")?;
        Ok(AuthMessage {
            message: Some(format!("Account created for {}", request.email)),
        })
    }

    async fn reset_password(&self, email: &str) -> Result<AuthMessage, ApiError> {
        self.record("reset_password")?;
        Ok(AuthMessage {
            message: Some(format!("Reset link sent to {}", email)),
        })
    }
}
