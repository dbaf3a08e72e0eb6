use std::path::PathBuf;

use url::Url;

use crate::errors::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    /// Substitute demo / locally synthesized data when the API fails instead
    /// of reporting the error.
    pub offline_fallback_enabled: bool,
    pub session_file: PathBuf,
    pub request_timeout_secs: u64,
}

/// Values given on the command line. They replace the matching environment
/// variables before anything is parsed.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub offline_fallback_enabled: Option<bool>,
}

pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_env_with(ConfigOverrides::default())
    }

    pub fn from_env_with(overrides: ConfigOverrides) -> Result<Self, AppError> {
        Self::from_source(env_var, overrides)
    }

    fn from_source(
        var: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> Result<Self, AppError> {
        let api_url = overrides
            .api_url
            .or_else(|| var("PRICEWATCH_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let offline_fallback_enabled = match overrides.offline_fallback_enabled {
            Some(enabled) => enabled,
            None => var("OFFLINE_FALLBACK_ENABLED")
                .map(|v| parse_flag("OFFLINE_FALLBACK_ENABLED", &v))
                .transpose()?
                .unwrap_or(true),
        };

        let session_file = var("PRICEWATCH_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_session_file(var("HOME")));

        let request_timeout_secs = match var("PRICEWATCH_HTTP_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| {
                AppError::Config(format!("PRICEWATCH_HTTP_TIMEOUT_SECS is not a number: {}", v))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            api_base_url: parse_api_url(&api_url)?,
            offline_fallback_enabled,
            session_file,
            request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self.api_base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AppError::Config(format!(
                    "API URL must use http or https, got {}",
                    other
                )))
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "PRICEWATCH_HTTP_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn parse_api_url(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| AppError::Config(format!("Invalid API URL {}: {}", raw, e)))
}

pub fn parse_flag(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!("{} must be true or false, got {}", name, raw))),
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    home.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pricewatch")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            AppConfig::from_source(source(&[("HOME", "/home/ada")]), ConfigOverrides::default())
                .unwrap();

        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/");
        assert!(config.offline_fallback_enabled);
        assert_eq!(
            config.session_file,
            PathBuf::from("/home/ada/.pricewatch/session.json")
        );
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_overrides_win_over_malformed_env() {
        let vars = source(&[
            ("PRICEWATCH_API_URL", "not a url"),
            ("OFFLINE_FALLBACK_ENABLED", "sometimes"),
        ]);

        let config = AppConfig::from_source(
            vars,
            ConfigOverrides {
                api_url: Some("https://api.example.com".to_string()),
                offline_fallback_enabled: Some(false),
            },
        )
        .unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://api.example.com/");
        assert!(!config.offline_fallback_enabled);
    }

    #[test]
    fn test_malformed_env_without_override_is_rejected() {
        let result = AppConfig::from_source(
            source(&[("PRICEWATCH_API_URL", "not a url")]),
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = AppConfig::from_source(
            source(&[("PRICEWATCH_HTTP_TIMEOUT_SECS", "0")]),
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    fn config(url: &str) -> AppConfig {
        AppConfig {
            api_base_url: parse_api_url(url).unwrap(),
            offline_fallback_enabled: true,
            session_file: PathBuf::from("session.json"),
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn test_validate_accepts_http_and_https() {
        assert!(config("http://localhost:8000").validate().is_ok());
        assert!(config("https://api.example.com/v1").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_other_schemes_and_zero_timeout() {
        assert!(config("ftp://example.com").validate().is_err());

        let mut zero = config("http://localhost:8000");
        zero.request_timeout_secs = 0;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "ON").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(parse_flag("X", "sometimes").is_err());
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(matches!(parse_api_url("not a url"), Err(AppError::Config(_))));
    }
}
