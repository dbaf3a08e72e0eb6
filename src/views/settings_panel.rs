use tabled::builder::Builder;
use tabled::settings::Style;

use crate::models::UserSettings;

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

pub fn render_settings(settings: &UserSettings) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Setting", "Value"]);
    builder.push_record(["email_notifications".to_string(), on_off(settings.email_notifications)]);
    builder.push_record(["push_notifications".to_string(), on_off(settings.push_notifications)]);
    builder.push_record([
        "check_interval_hours".to_string(),
        settings.check_interval_hours.to_string(),
    ]);
    builder.push_record(["currency".to_string(), settings.currency.clone()]);
    for (key, value) in &settings.extra {
        builder.push_record([key.clone(), value.to_string()]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}
