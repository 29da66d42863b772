//! Client configuration.
//!
//! A [`ClientConfig`] carries the API key, the target [`Environment`] and the
//! optional IPN secret. It is immutable once built and can be shared freely
//! between tasks.
//!
//! # Environment Variables
//!
//! [`ClientConfig::from_env`] reads:
//!
//! - `NOWPAYMENTS_API_KEY` - API key (required)
//! - `NOWPAYMENTS_SANDBOX` - `true`/`1` selects the sandbox endpoint
//! - `NOWPAYMENTS_IPN_SECRET` - secret used to verify IPN callbacks

use std::fmt;
use std::time::Duration;

use crate::error::ConfigurationError;

/// Base URL of the live gateway.
pub const PRODUCTION_BASE_URL: &str = "https://api.nowpayments.io/v1";

/// Base URL of the sandbox gateway.
pub const SANDBOX_BASE_URL: &str = "https://api-sandbox.nowpayments.io/v1";

/// Default timeout applied to every REST request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which gateway deployment the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The live gateway.
    #[default]
    Production,
    /// The test gateway; no real funds move.
    Sandbox,
}

impl Environment {
    /// Returns the REST base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_BASE_URL,
            Self::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

/// Shared secret used as the HMAC key for IPN verification.
///
/// The value is never transmitted and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct IpnSecret(String);

impl IpnSecret {
    /// Wraps a secret value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for IpnSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IpnSecret(***)")
    }
}

impl From<&str> for IpnSecret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IpnSecret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Configuration for a NOWPayments client.
///
/// # Example
///
/// ```rust
/// use nowpayments::config::{ClientConfig, Environment};
///
/// let config = ClientConfig::new("my-api-key")
///     .unwrap()
///     .with_sandbox(true)
///     .with_ipn_secret("my-ipn-secret");
/// assert_eq!(config.environment(), Environment::Sandbox);
/// assert!(config.ipn_secret().is_some());
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    environment: Environment,
    ipn_secret: Option<IpnSecret>,
    base_url_override: Option<String>,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a production configuration with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingApiKey`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigurationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            environment: Environment::Production,
            ipn_secret: None,
            base_url_override: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Builds a configuration from `NOWPAYMENTS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingApiKey`] if the API key variable is
    /// unset or empty, and [`ConfigurationError::InvalidEnvVar`] if
    /// `NOWPAYMENTS_SANDBOX` is not a boolean.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let api_key = std::env::var("NOWPAYMENTS_API_KEY").unwrap_or_default();
        let mut config = Self::new(api_key)?;

        if let Ok(raw) = std::env::var("NOWPAYMENTS_SANDBOX") {
            config = config.with_sandbox(parse_bool("NOWPAYMENTS_SANDBOX", &raw)?);
        }
        if let Ok(secret) = std::env::var("NOWPAYMENTS_IPN_SECRET")
            && !secret.is_empty()
        {
            config = config.with_ipn_secret(secret);
        }
        Ok(config)
    }

    /// Selects the sandbox (`true`) or production (`false`) gateway.
    #[must_use]
    pub const fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.environment = if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        };
        self
    }

    /// Sets the IPN secret used by the convenience verification methods.
    #[must_use]
    pub fn with_ipn_secret(mut self, secret: impl Into<IpnSecret>) -> Self {
        self.ipn_secret = Some(secret.into());
        self
    }

    /// Points the client at a custom base URL (e.g. a mock server).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the selected environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the effective REST base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .map_or_else(|| self.environment.base_url(), |url| url.trim_end_matches('/'))
    }

    /// Returns the IPN secret, if configured.
    #[must_use]
    pub const fn ipn_secret(&self) -> Option<&IpnSecret> {
        self.ipn_secret.as_ref()
    }

    /// Returns the IPN secret or the error convenience methods surface.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingIpnSecret`] if no secret is set.
    pub fn require_ipn_secret(&self) -> Result<&IpnSecret, ConfigurationError> {
        self.ipn_secret
            .as_ref()
            .ok_or(ConfigurationError::MissingIpnSecret)
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url())
            .field("has_ipn_secret", &self.ipn_secret.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigurationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigurationError::InvalidEnvVar {
            name,
            value: raw.to_owned(),
        }),
    }
}
