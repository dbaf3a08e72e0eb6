use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ProductId;

// A server-generated notice, typically a target price being reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
