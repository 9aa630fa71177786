//! Client configuration from environment variables.

use std::time::Duration;

use storefront_auth::{AuthToken, Session};
use storefront_observability::LogFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8082/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_URL: &str = "STOREFRONT_API_URL";
const AUTH_TOKEN: &str = "STOREFRONT_AUTH_TOKEN";
const USERNAME: &str = "STOREFRONT_USERNAME";
const BALANCE: &str = "STOREFRONT_BALANCE";
const TIMEOUT_SECS: &str = "STOREFRONT_TIMEOUT_SECS";
const LOG_FORMAT: &str = "STOREFRONT_LOG_FORMAT";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub auth_token: Option<AuthToken>,
    pub username: Option<String>,
    pub balance: Option<f64>,
    pub timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            username: None,
            balance: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_format: LogFormat::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Unset and blank variables take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL) {
            config.api_url = url.trim().to_string();
        }
        if let Some(raw) = get(AUTH_TOKEN) {
            config.auth_token = Some(AuthToken::new(raw).map_err(|e| ConfigError::invalid(AUTH_TOKEN, e))?);
        }
        config.username = get(USERNAME).map(|u| u.trim().to_string());
        if let Some(raw) = get(BALANCE) {
            let balance: f64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(BALANCE, e))?;
            if !balance.is_finite() {
                return Err(ConfigError::invalid(BALANCE, "must be a finite number"));
            }
            config.balance = Some(balance);
        }
        if let Some(raw) = get(TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(TIMEOUT_SECS, e))?;
            if secs == 0 {
                return Err(ConfigError::invalid(TIMEOUT_SECS, "must be at least 1"));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(LOG_FORMAT) {
            config.log_format = raw.parse().map_err(|e| ConfigError::invalid(LOG_FORMAT, e))?;
        }

        Ok(config)
    }

    /// Session implied by the configured credentials.
    pub fn session(&self) -> Session {
        match &self.auth_token {
            Some(token) => Session::signed_in(
                token.clone(),
                self.username.clone().unwrap_or_default(),
                self.balance,
            ),
            None => Session::anonymous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.session().is_signed_in());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("STOREFRONT_API_URL", "http://shop.test/api"),
            ("STOREFRONT_AUTH_TOKEN", "abc"),
            ("STOREFRONT_USERNAME", "crio.do"),
            ("STOREFRONT_BALANCE", "5000"),
            ("STOREFRONT_TIMEOUT_SECS", "5"),
            ("STOREFRONT_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://shop.test/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);

        let session = config.session();
        assert_eq!(session.token().map(AuthToken::expose), Some("abc"));
        assert_eq!(session.username(), Some("crio.do"));
        assert_eq!(session.balance(), Some(5000.0));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("STOREFRONT_AUTH_TOKEN", "  "), ("STOREFRONT_API_URL", "")]).unwrap();
        assert_eq!(config.auth_token, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn invalid_values_are_errors() {
        let cases = [
            ("STOREFRONT_TIMEOUT_SECS", "soon"),
            ("STOREFRONT_TIMEOUT_SECS", "0"),
            ("STOREFRONT_BALANCE", "lots"),
            ("STOREFRONT_BALANCE", "inf"),
            ("STOREFRONT_LOG_FORMAT", "xml"),
            ("STOREFRONT_AUTH_TOKEN", "two words"),
        ];
        for (var, value) in cases {
            match config(&[(var, value)]) {
                Err(ConfigError::Invalid { var: got, .. }) => assert_eq!(got, var),
                other => panic!("expected {var}={value} to be rejected, got {other:?}"),
            }
        }
    }
}
