//! Error types shared by every NOWPayments operation.
//!
//! Attacker-controlled input (a malformed or forged IPN body) never produces
//! one of these errors; it is folded into a rejected verification instead.
//! The errors here describe caller mistakes.

use std::fmt;

/// The client was used without a setting it requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The API key was empty.
    #[error("API key is required")]
    MissingApiKey,

    /// An IPN convenience method was called but no IPN secret was configured.
    #[error("IPN secret not configured in client")]
    MissingIpnSecret,

    /// An environment variable was present but could not be interpreted.
    #[error("invalid value for environment variable {name}: {value:?}")]
    InvalidEnvVar {
        /// Name of the variable.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// A request payload is missing one or more required fields.
///
/// Raised before any network call is made. The missing names are kept in the
/// order the operation declared them as required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    missing: Vec<String>,
}

impl ValidationError {
    /// Creates a validation error for the given missing field names.
    #[must_use]
    pub fn new<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the names of the missing fields, in declaration order.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        &self.missing
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing required fields: {}", self.missing.join(", "))
    }
}

impl std::error::Error for ValidationError {}
