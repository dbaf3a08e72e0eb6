use tabled::builder::Builder;
use tabled::settings::Style;

use crate::models::Notification;

pub fn render_notifications(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.".to_string();
    }

    let unread = notifications.iter().filter(|n| !n.read).count();

    let mut builder = Builder::default();
    builder.push_record(["ID", "", "Message", "Product", "Received"]);
    for n in notifications {
        builder.push_record([
            n.id.to_string(),
            if n.read { "" } else { "new" }.to_string(),
            n.message.clone(),
            n.product_id.map(|id| id.to_string()).unwrap_or_default(),
            n.created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    format!("Notifications ({} unread)\n{}", unread, table)
}
