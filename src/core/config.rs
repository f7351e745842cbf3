//! Runtime configuration, read from the environment at startup.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::time::Duration;

const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = match lookup("MINDMATE_BACKEND_URL") {
            Some(raw) => parse_backend_url(&raw)?,
            None => DEFAULT_BACKEND_URL.to_string(),
        };

        let poll_interval =
            parse_secs(&lookup, "MINDMATE_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let poll_timeout =
            parse_secs(&lookup, "MINDMATE_POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS)?;
        let http_timeout =
            parse_secs(&lookup, "MINDMATE_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        Ok(Self { backend_url, poll_interval, poll_timeout, http_timeout })
    }
}

fn parse_backend_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::MissingVar("MINDMATE_BACKEND_URL".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(
            "MINDMATE_BACKEND_URL".to_string(),
            format!("'{}' must start with http:// or https://", raw),
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(Duration::from_secs(default));
    };

    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))?;

    if secs == 0 {
        return Err(ConfigError::InvalidValue(key.to_string(), "must be greater than 0".into()));
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poll_timeout, Duration::from_secs(600));
    }

    #[test]
    fn backend_url_is_trimmed() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("MINDMATE_BACKEND_URL", " https://api.test/ ")]))
                .unwrap();
        assert_eq!(config.backend_url, "https://api.test");
    }

    #[test]
    fn rejects_bad_values() {
        let bad_scheme = AppConfig::from_lookup(lookup_from(&[("MINDMATE_BACKEND_URL", "ftp://x")]));
        assert!(matches!(bad_scheme, Err(ConfigError::InvalidValue(..))));

        let zero = AppConfig::from_lookup(lookup_from(&[("MINDMATE_POLL_INTERVAL_SECS", "0")]));
        assert!(matches!(zero, Err(ConfigError::InvalidValue(..))));

        let garbage = AppConfig::from_lookup(lookup_from(&[("MINDMATE_POLL_TIMEOUT_SECS", "ten")]));
        assert!(matches!(garbage, Err(ConfigError::InvalidValue(..))));
    }
}
