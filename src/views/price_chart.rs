use tabled::builder::Builder;
use tabled::settings::{object::Columns, Alignment, Style};

use crate::models::{PriceSeries, Product, TimeRange};
use crate::services::price_history_service::HistoryView;
use crate::views::format_price;

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub const SYNTHETIC_BANNER: &str = "SYNTHETIC DATA: placeholder trend, not observed prices";

pub fn sparkline(series: &PriceSeries) -> String {
    let prices: Vec<f64> = series.points.iter().map(|p| p.price).collect();
    let (min, max) = prices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });

    let span = max - min;
    prices
        .iter()
        .map(|p| {
            if span <= f64::EPSILON {
                SPARK_BARS[SPARK_BARS.len() / 2]
            } else {
                let idx = ((p - min) / span * (SPARK_BARS.len() - 1) as f64).round() as usize;
                SPARK_BARS[idx.min(SPARK_BARS.len() - 1)]
            }
        })
        .collect()
}

pub fn render_price_chart(product: &Product, range: TimeRange, view: &HistoryView) -> String {
    let mut out = Vec::new();

    out.push(format!(
        "{}  {}  (target {})",
        product.name,
        format_price(product.current_price),
        format_price(product.target_price)
    ));

    let change = view
        .series
        .change()
        .map(|c| {
            let arrow = if c.absolute < 0.0 { "↓" } else { "↑" };
            format!("{} {:+.2} ({:+.1}%)", arrow, c.absolute, c.percent)
        })
        .unwrap_or_else(|| "n/a".to_string());
    out.push(format!("Range: {}  Change: {}", range, change));

    if view.series.is_synthetic() {
        out.push(SYNTHETIC_BANNER.to_string());
    }
    if let Some(error) = &view.error {
        out.push(format!("! {}", error));
    }

    if view.series.points.is_empty() {
        out.push("No price history yet.".to_string());
        return out.join("\n");
    }

    out.push(format!("Trend: {}", sparkline(&view.series)));

    let mut builder = Builder::default();
    builder.push_record(["Date", "Price", "vs target"]);
    for point in &view.series.points {
        builder.push_record([
            point.date.format("%d %b").to_string(),
            format_price(point.price),
            format!("{:+.2}", point.price - product.target_price),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..), Alignment::right());
    out.push(table.to_string());

    out.join("\n")
}
