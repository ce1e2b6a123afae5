//! Provider configuration.
//!
//! Each setting resolves from the explicit value first, then the
//! environment, then a built-in default.

use std::fmt;
use std::time::Duration;

use rackdog_client::HttpClient;
use thiserror::Error;

use crate::policy::ReconciliationPolicy;

pub const ENDPOINT_ENV: &str = "RACKDOG_ENDPOINT";
pub const API_KEY_ENV: &str = "RACKDOG_API_KEY";
pub const RECREATE_ON_MISSING_ENV: &str = "RACKDOG_RECREATE_ON_MISSING";
pub const DEFAULT_ENDPOINT: &str = "https://metal.rackdog.com";

/// Configuration errors. Always reported before any remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no api_key given and RACKDOG_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl ConfigError {
    pub fn summary(&self) -> &'static str {
        match self {
            ConfigError::MissingApiKey => "Missing API key",
            ConfigError::InvalidEndpoint { .. } => "Invalid endpoint",
        }
    }
}

/// Explicitly provided settings. Unset fields fall back to the environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub recreate_on_missing: Option<bool>,
    pub timeout: Option<Duration>,
}

/// Fully resolved provider configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
    pub policy: ReconciliationPolicy,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ProviderSettings {
    /// Resolve against the process environment.
    pub fn resolve(self) -> Result<ProviderConfig, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(self, env: F) -> Result<ProviderConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).filter(|v| !v.is_empty());

        let endpoint = self
            .endpoint
            .or_else(|| lookup(ENDPOINT_ENV))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let api_key = self
            .api_key
            .or_else(|| lookup(API_KEY_ENV))
            .unwrap_or_default();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let recreate_on_missing = match self.recreate_on_missing {
            Some(value) => value,
            None => lookup(RECREATE_ON_MISSING_ENV).is_some_and(|v| parse_flag(&v)),
        };

        Ok(ProviderConfig {
            endpoint,
            api_key,
            timeout: self.timeout.unwrap_or(HttpClient::DEFAULT_TIMEOUT),
            policy: ReconciliationPolicy::new(recreate_on_missing),
        })
    }
}

/// `1` and `true` (any case) enable a flag; anything else disables it.
fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("1") || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_key_from_env() {
        let config = ProviderSettings::default()
            .resolve_with(env(&[(API_KEY_ENV, "env-key")]))
            .unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.timeout, HttpClient::DEFAULT_TIMEOUT);
        assert!(!config.policy.recreate_on_missing);
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let settings = ProviderSettings {
            endpoint: Some("https://staging.rackdog.test".to_string()),
            api_key: Some("explicit".to_string()),
            recreate_on_missing: Some(false),
            timeout: Some(Duration::from_secs(5)),
        };
        let config = settings
            .resolve_with(env(&[
                (ENDPOINT_ENV, "https://env.rackdog.test"),
                (API_KEY_ENV, "env-key"),
                (RECREATE_ON_MISSING_ENV, "true"),
            ]))
            .unwrap();
        assert_eq!(config.endpoint, "https://staging.rackdog.test");
        assert_eq!(config.api_key, "explicit");
        assert!(!config.policy.recreate_on_missing);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_api_key() {
        let err = ProviderSettings::default()
            .resolve_with(env(&[(API_KEY_ENV, "")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert_eq!(err.summary(), "Missing API key");
    }

    #[test]
    fn test_empty_env_endpoint_uses_default() {
        let config = ProviderSettings::default()
            .resolve_with(env(&[(ENDPOINT_ENV, ""), (API_KEY_ENV, "k")]))
            .unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_recreate_on_missing_env_values() {
        for (value, expected) in [
            ("1", true),
            ("true", true),
            ("TRUE", true),
            ("yes", false),
            ("0", false),
            ("false", false),
        ] {
            let config = ProviderSettings::default()
                .resolve_with(env(&[(API_KEY_ENV, "k"), (RECREATE_ON_MISSING_ENV, value)]))
                .unwrap();
            assert_eq!(config.policy.recreate_on_missing, expected, "value {value:?}");
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderSettings {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        }
        .resolve_with(|_| None)
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }
}
