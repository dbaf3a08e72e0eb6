use serde::{Deserialize, Serialize};

/// Aggregate counters shown on top of the dashboard. Never stored, always
/// recomputed from the current product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub active_monitoring: usize,
    pub targets_reached: usize,
    pub total_savings: f64,
}
