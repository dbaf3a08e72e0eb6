use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_check_interval() -> u32 {
    1
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Per-user notification and display preferences stored by the API.
///
/// Keys this client does not know about are kept in `extra` so a read-modify-write
/// cycle never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default)]
    pub push_notifications: bool,
    #[serde(default = "default_check_interval")]
    pub check_interval_hours: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: false,
            check_interval_hours: default_check_interval(),
            currency: default_currency(),
            extra: BTreeMap::new(),
        }
    }
}

impl UserSettings {
    /// Apply a single `key=value` change as typed by the user.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "email_notifications" => {
                self.email_notifications = parse_bool(key, value)?;
            }
            "push_notifications" => {
                self.push_notifications = parse_bool(key, value)?;
            }
            "check_interval_hours" => {
                let hours: u32 = value
                    .parse()
                    .map_err(|_| format!("{} must be a whole number of hours", key))?;
                if hours == 0 {
                    return Err(format!("{} must be at least 1", key));
                }
                self.check_interval_hours = hours;
            }
            "currency" => {
                let code = value.trim().to_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(format!("Invalid currency code: {}", value));
                }
                self.currency = code;
            }
            _ => return Err(format!("Unknown setting: {}", key)),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(format!("{} must be true or false", key)),
    }
}
