//! Provider configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ProviderError;
use crate::providers::dnsimple::{DEFAULT_API_URL, PROVIDER_NAME};
use crate::types::ReconcileOptions;
use crate::utils::log_sanitizer::mask_secret;

pub const ENV_API_ACCESS_TOKEN: &str = "DNSIMPLE_API_ACCESS_TOKEN";
pub const ENV_ACCOUNT_ID: &str = "DNSIMPLE_ACCOUNT_ID";
pub const ENV_API_URL: &str = "DNSIMPLE_API_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "DNSIMPLE_REQUEST_TIMEOUT";
pub const ENV_MAX_CONCURRENCY: &str = "DNSIMPLE_MAX_CONCURRENCY";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Configuration errors, detected before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API access token is missing")]
    MissingToken,

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

impl From<ConfigError> for ProviderError {
    fn from(err: ConfigError) -> Self {
        ProviderError::InitializationFailed {
            provider: PROVIDER_NAME.to_string(),
            detail: err.to_string(),
        }
    }
}

/// Everything needed to talk to DNSimple.
///
/// Field names match the JSON keys of the provider's config block
/// (`api_access_token`, `account_id`, `api_url`). Empty strings count as unset.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer token (account or user token).
    pub api_access_token: String,
    /// Account id; resolved through `whoami` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Base URL override, e.g. the sandbox `https://api.sandbox.dnsimple.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Retries for idempotent requests (GET/PATCH/DELETE).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-record remote calls in flight at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub reconcile: ReconcileOptions,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl ProviderConfig {
    pub fn new(api_access_token: impl Into<String>) -> Self {
        Self {
            api_access_token: api_access_token.into(),
            account_id: None,
            api_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            reconcile: ReconcileOptions::default(),
        }
    }

    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    #[must_use]
    pub fn with_reconcile(mut self, reconcile: ReconcileOptions) -> Self {
        self.reconcile = reconcile;
        self
    }

    /// Load from `DNSIMPLE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var(ENV_API_ACCESS_TOKEN).map_err(|_| ConfigError::MissingToken)?;
        let mut config = Self::new(token);
        config.account_id = env::var(ENV_ACCOUNT_ID).ok();
        config.api_url = env::var(ENV_API_URL).ok();
        if let Ok(raw) = env::var(ENV_REQUEST_TIMEOUT) {
            config.request_timeout_secs = parse_env(ENV_REQUEST_TIMEOUT, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_MAX_CONCURRENCY) {
            config.max_concurrency = parse_env(ENV_MAX_CONCURRENCY, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration without touching the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_access_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrency".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(account_id) = self.account_id()
            && account_id.contains('/')
        {
            return Err(ConfigError::InvalidValue {
                key: "account_id".to_string(),
                value: account_id.to_string(),
                reason: "must not contain '/'".to_string(),
            });
        }
        let url = self.base_url();
        match reqwest::Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            Ok(parsed) => Err(ConfigError::InvalidApiUrl {
                url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }),
            Err(e) => Err(ConfigError::InvalidApiUrl {
                url,
                reason: e.to_string(),
            }),
        }
    }

    /// The configured account id, ignoring empty values.
    pub fn account_id(&self) -> Option<&str> {
        self.account_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// API base URL without trailing slash.
    pub fn base_url(&self) -> String {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_access_token", &mask_secret(&self.api_access_token))
            .field("account_id", &self.account_id)
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("max_concurrency", &self.max_concurrency)
            .field("reconcile", &self.reconcile)
            .finish()
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
