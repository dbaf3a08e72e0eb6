use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use crate::config::{env_var, parse_flag};
use crate::errors::AppError;

/// Where shipped log lines are labelled as coming from.
const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Loki push target, only present when `LOKI_ENABLED` is on.
#[derive(Debug, Clone, PartialEq)]
pub struct LokiTarget {
    pub url: Url,
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives. `RUST_LOG` wins over `-v`.
    pub filter: String,
    pub loki: Option<LokiTarget>,
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl LoggingConfig {
    /// `verbosity` is the number of `-v` flags on the command line.
    pub fn from_env(verbosity: u8) -> Result<Self, AppError> {
        Self::from_source(env_var, verbosity)
    }

    fn from_source(var: impl Fn(&str) -> Option<String>, verbosity: u8) -> Result<Self, AppError> {
        let filter = var("RUST_LOG")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| level_for(verbosity).to_string());

        let loki_enabled = var("LOKI_ENABLED")
            .map(|v| parse_flag("LOKI_ENABLED", &v))
            .transpose()?
            .unwrap_or(false);

        let loki = if loki_enabled {
            let raw = var("LOKI_URL").ok_or_else(|| {
                AppError::Config("LOKI_ENABLED is true but LOKI_URL is not set".to_string())
            })?;
            let url = Url::parse(&raw)
                .map_err(|e| AppError::Config(format!("Invalid LOKI_URL {}: {}", raw, e)))?;
            Some(LokiTarget {
                url,
                environment: var("PRICEWATCH_ENV").unwrap_or_else(|| "development".to_string()),
            })
        } else {
            None
        };

        Ok(Self { filter, loki })
    }
}

/// Install the global subscriber. Log lines go to stderr; stdout belongs to
/// the rendered screens.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(&config.filter)?;
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    #[cfg(feature = "loki")]
    {
        if let Some(target) = config.loki {
            let (loki_layer, task) = tracing_loki::builder()
                .label("service", SERVICE_NAME)?
                .label("environment", &target.environment)?
                .extra_field("version", env!("CARGO_PKG_VERSION"))?
                .build_url(target.url.clone())?;
            tokio::spawn(task);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(loki_layer)
                .try_init()?;
            tracing::debug!("Shipping logs to Loki at {}", target.url);
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .try_init()?;

    #[cfg(not(feature = "loki"))]
    {
        if config.loki.is_some() {
            tracing::warn!(
                "LOKI_ENABLED is set but {} was built without the loki feature",
                SERVICE_NAME
            );
        }
    }
    Ok(())
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
    fn test_verbosity_sets_default_level() {
        let quiet = LoggingConfig::from_source(source(&[]), 0).unwrap();
        assert_eq!(quiet.filter, "warn");
        assert!(quiet.loki.is_none());

        assert_eq!(LoggingConfig::from_source(source(&[]), 2).unwrap().filter, "debug");
        assert_eq!(LoggingConfig::from_source(source(&[]), 7).unwrap().filter, "trace");
    }

    #[test]
    fn test_rust_log_wins_over_verbosity() {
        let config =
            LoggingConfig::from_source(source(&[("RUST_LOG", "pricewatch=debug")]), 1).unwrap();
        assert_eq!(config.filter, "pricewatch=debug");
    }

    #[test]
    fn test_loki_requires_valid_url() {
        let missing = LoggingConfig::from_source(source(&[("LOKI_ENABLED", "true")]), 0);
        assert!(matches!(missing, Err(AppError::Config(_))));

        let bad = LoggingConfig::from_source(
            source(&[("LOKI_ENABLED", "true"), ("LOKI_URL", "::nope")]),
            0,
        );
        assert!(matches!(bad, Err(AppError::Config(_))));

        let config = LoggingConfig::from_source(
            source(&[
                ("LOKI_ENABLED", "yes"),
                ("LOKI_URL", "http://localhost:3100"),
                ("PRICEWATCH_ENV", "staging"),
            ]),
            0,
        )
        .unwrap();
        let target = config.loki.unwrap();
        assert_eq!(target.url.as_str(), "http://localhost:3100/");
        assert_eq!(target.environment, "staging");
    }
}
