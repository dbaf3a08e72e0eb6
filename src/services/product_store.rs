use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::tracker_api::{ApiError, ProductApi};
use crate::models::{
    CreateProductRequest, DashboardStats, Product, ProductId, UpdateProductRequest,
};
use crate::services::stats_service;

/// What to do when the API cannot serve a product operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Keep the dashboard usable: demo data on load, local records on writes.
    OfflineFallback,
    /// Report every API failure to the caller.
    Strict,
}

impl FallbackPolicy {
    pub fn from_flag(offline_fallback_enabled: bool) -> Self {
        if offline_fallback_enabled {
            FallbackPolicy::OfflineFallback
        } else {
            FallbackPolicy::Strict
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self == FallbackPolicy::OfflineFallback
    }
}

/// Which path produced the result of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub product: Product,
    pub origin: Origin,
}

/// Timestamp-derived ids for records created while the API is unreachable.
/// Strictly increasing within one store.
#[derive(Debug, Default)]
struct FallbackIdGenerator {
    last: ProductId,
}

impl FallbackIdGenerator {
    fn next(&mut self, taken: &[Product]) -> ProductId {
        let mut id = Utc::now().timestamp_millis().max(self.last + 1);
        while taken.iter().any(|p| p.id == id) {
            id += 1;
        }
        self.last = id;
        id
    }
}

/// Fixed dataset shown when the product list cannot be fetched.
pub fn demo_products() -> Vec<Product> {
    let now = Some(Utc::now());
    vec![
        Product {
            id: 1,
            name: "iPhone 15 Pro".to_string(),
            url: "https://example.com/iphone-15-pro".to_string(),
            current_price: 1199.99,
            target_price: 1000.00,
            image: "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=300&h=300&fit=crop"
                .to_string(),
            last_checked: now,
        },
        Product {
            id: 2,
            name: "MacBook Air M3".to_string(),
            url: "https://example.com/macbook-air-m3".to_string(),
            current_price: 1399.99,
            target_price: 1200.00,
            image: "https://images.unsplash.com/photo-1541807084-5c52b6b3adef?w=300&h=300&fit=crop"
                .to_string(),
            last_checked: now,
        },
        Product {
            id: 3,
            name: "Sony WH-1000XM5".to_string(),
            url: "https://example.com/sony-headphones".to_string(),
            current_price: 299.99,
            target_price: 250.00,
            image: "https://images.unsplash.com/photo-1583394838336-acd977736f90?w=300&h=300&fit=crop"
                .to_string(),
            last_checked: now,
        },
    ]
}

/// Product list owned by one dashboard session, newest first.
pub struct ProductStore {
    api: Arc<dyn ProductApi>,
    policy: FallbackPolicy,
    products: Vec<Product>,
    selected: Option<ProductId>,
    ids: FallbackIdGenerator,
}

impl ProductStore {
    pub fn new(api: Arc<dyn ProductApi>, policy: FallbackPolicy) -> Self {
        Self {
            api,
            policy,
            products: Vec::new(),
            selected: None,
            ids: FallbackIdGenerator::default(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn stats(&self) -> DashboardStats {
        stats_service::compute_stats(&self.products)
    }

    pub fn select(&mut self, id: ProductId) -> Result<&Product, AppError> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound(id))?;
        self.selected = Some(id);
        Ok(product)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.and_then(|id| self.get(id))
    }

    /// A rejected token is never papered over with local data; the caller has
    /// to send the user back to the login screen.
    fn fallback_or(&self, e: ApiError, action: &str) -> Result<(), AppError> {
        if self.policy.is_enabled() && !matches!(e, ApiError::Unauthorized) {
            warn!("API {} failed, using local data: {}", action, e);
            Ok(())
        } else {
            Err(e.into())
        }
    }

    pub async fn load(&mut self) -> Result<Origin, AppError> {
        match self.api.get_products().await {
            Ok(products) => {
                info!("Loaded {} products from API", products.len());
                self.products = products;
                Ok(Origin::Remote)
            }
            Err(e) => {
                self.fallback_or(e, "fetch")?;
                self.products = demo_products();
                Ok(Origin::Fallback)
            }
        }
    }

    pub async fn add(&mut self, request: CreateProductRequest) -> Result<Mutation, AppError> {
        let (product, origin) = match self.api.create_product(&request).await {
            Ok(product) => (product, Origin::Remote),
            Err(e) => {
                self.fallback_or(e, "create")?;
                let id = self.ids.next(&self.products);
                (Product::from_create_request(id, request), Origin::Fallback)
            }
        };

        self.products.insert(0, product.clone());
        Ok(Mutation { product, origin })
    }

    pub async fn update(
        &mut self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> Result<Mutation, AppError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(AppError::NotFound(id))?;

        let (product, origin) = match self.api.update_product(id, &request).await {
            Ok(product) => (product, Origin::Remote),
            Err(e) => {
                self.fallback_or(e, "update")?;
                (self.products[index].merged_with(&request), Origin::Fallback)
            }
        };

        self.products[index] = product.clone();
        Ok(Mutation { product, origin })
    }

    /// Remove `id` from the list. The local removal happens whatever the API
    /// answers; under [`FallbackPolicy::Strict`] the API error is still
    /// returned afterwards.
    pub async fn remove(&mut self, id: ProductId) -> Result<Origin, AppError> {
        let result = self.api.delete_product(id).await;

        self.products.retain(|p| p.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }

        match result {
            Ok(()) => Ok(Origin::Remote),
            Err(e) => {
                self.fallback_or(e, "delete")?;
                Ok(Origin::Fallback)
            }
        }
    }
}
