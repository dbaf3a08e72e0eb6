use crate::models::{DashboardStats, Product, ProductStatus};

/// Reached targets are assumed to have started 10% above the target price.
const ORIGINAL_PRICE_MARKUP: f64 = 1.1;

pub fn compute_stats(products: &[Product]) -> DashboardStats {
    products
        .iter()
        .fold(
            DashboardStats {
                total_products: products.len(),
                ..Default::default()
            },
            |mut stats, product| {
                match product.status() {
                    ProductStatus::Monitoring => stats.active_monitoring += 1,
                    ProductStatus::TargetReached => {
                        stats.targets_reached += 1;
                        stats.total_savings +=
                            product.target_price * ORIGINAL_PRICE_MARKUP - product.current_price;
                    }
                }
                stats
            },
        )
}
