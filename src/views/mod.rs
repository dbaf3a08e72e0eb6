//! Plain-text rendering of the dashboard screens.

mod notification_list;
mod price_chart;
mod product_list;
mod settings_panel;
mod stats_cards;

pub use notification_list::render_notifications;
pub use price_chart::{render_price_chart, sparkline, SYNTHETIC_BANNER};
pub use product_list::{render_product_list, EMPTY_LIST_MESSAGE};
pub use settings_panel::render_settings;
pub use stats_cards::render_stats_cards;

use crate::models::User;

pub fn format_price(price: f64) -> String {
    format!("€{:.2}", price)
}

pub fn render_welcome(user: Option<&User>) -> String {
    let name = user.map(User::display_name).unwrap_or("there");
    format!("Hi, {}! Here is a summary of your tracked products.", name)
}
