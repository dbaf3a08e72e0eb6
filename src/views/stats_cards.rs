use tabled::builder::Builder;
use tabled::settings::{object::Rows, Alignment, Style};

use crate::models::DashboardStats;
use crate::views::format_price;

pub fn render_stats_cards(stats: &DashboardStats) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Tracked products",
        "Active monitoring",
        "Targets reached",
        "Total savings",
    ]);
    builder.push_record([
        stats.total_products.to_string(),
        stats.active_monitoring.to_string(),
        stats.targets_reached.to_string(),
        format_price(stats.total_savings),
    ]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::new(1..), Alignment::center());
    table.to_string()
}
