use tabled::builder::Builder;
use tabled::settings::{object::Columns, Alignment, Style};

use crate::models::{Product, ProductId};
use crate::views::format_price;

pub const EMPTY_LIST_MESSAGE: &str =
    "No products tracked yet. Add your first product to start monitoring.";

pub fn render_product_list(products: &[Product], selected: Option<ProductId>) -> String {
    if products.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["", "ID", "Product", "Current", "Target", "Status", "Last checked"]);

    for product in products {
        let marker = if selected == Some(product.id) { ">" } else { "" };
        let last_checked = product
            .last_checked
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        builder.push_record([
            marker.to_string(),
            product.id.to_string(),
            product.name.clone(),
            format_price(product.current_price),
            format_price(product.target_price),
            product.status().to_string(),
            last_checked,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    format!("Your products ({})\n{}", products.len(), table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::product_store::demo_products;

    #[test]
    fn test_empty_list_message() {
        assert_eq!(render_product_list(&[], None), EMPTY_LIST_MESSAGE);
    }

    #[test]
    fn test_rows_show_status_and_prices() {
        let mut products = demo_products();
        products[2].current_price = 240.0;

        let rendered = render_product_list(&products, Some(2));

        assert!(rendered.starts_with("Your products (3)"));
        assert!(rendered.contains("iPhone 15 Pro"));
        assert!(rendered.contains("€1199.99"));
        assert!(rendered.contains("Monitoring"));
        assert!(rendered.contains("Target reached"));
    }
}
