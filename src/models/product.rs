use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ProductId = i64;

pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=300&h=300&fit=crop";

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

// ==============================================================================
// Product Models
// ==============================================================================

// A product URL tracked against a user-chosen target price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub current_price: f64,
    pub target_price: f64,
    #[serde(default = "placeholder_image")]
    pub image: String,
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
}

impl Product {
    pub fn status(&self) -> ProductStatus {
        if self.current_price <= self.target_price {
            ProductStatus::TargetReached
        } else {
            ProductStatus::Monitoring
        }
    }

    /// Build a product locally from a create request when the API could not
    /// store it.
    pub fn from_create_request(id: ProductId, request: CreateProductRequest) -> Self {
        Self {
            id,
            name: request.name,
            url: request.url,
            current_price: request.current_price,
            target_price: request.target_price,
            image: request.image,
            last_checked: Some(Utc::now()),
        }
    }

    /// Overlay the editable fields of `request` on this product. The URL never
    /// changes after creation.
    pub fn merged_with(&self, request: &UpdateProductRequest) -> Self {
        Self {
            id: self.id,
            name: request.name.clone(),
            url: self.url.clone(),
            current_price: request.current_price,
            target_price: request.target_price,
            image: request.image.clone(),
            last_checked: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    #[serde(rename = "monitoring")]
    Monitoring,
    #[serde(rename = "target_reached")]
    TargetReached,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Monitoring => write!(f, "Monitoring"),
            ProductStatus::TargetReached => write!(f, "Target reached"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub url: String,
    pub current_price: f64,
    pub target_price: f64,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub current_price: f64,
    pub target_price: f64,
    pub image: String,
}
