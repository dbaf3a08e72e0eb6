pub mod auth_service;
pub mod price_history_service;
pub mod product_store;
pub mod session;
pub mod stats_service;

#[cfg(test)]
pub(crate) mod fake_api;
