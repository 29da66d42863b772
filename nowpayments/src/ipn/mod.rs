//! Instant Payment Notification (IPN) verification.
//!
//! The gateway signs each callback with HMAC-SHA512 over a canonical
//! re-encoding of the JSON body (object keys sorted ascending) and sends the
//! lowercase hex digest in the [`SIGNATURE_HEADER`] header.
//!
//! ```text
//! raw body ──parse──▶ object ──canonicalize──▶ bytes ──HMAC──▶ hex ──ct_eq──▶ IpnPayload
//!     │                                                            │
//!     └──────────────── malformed ───────▶ None ◀──── mismatch ────┘
//! ```
//!
//! A malformed body and a bad signature produce the same `None` outcome, so
//! callers cannot tell which check failed. Only a missing secret in the
//! config-bound variants is reported as an error.
//!
//! # Example
//!
//! ```rust
//! use nowpayments::ipn::{canonicalize, compute_signature, process_notification};
//!
//! let body = br#"{"payment_status":"finished","payment_id":123}"#;
//! let value: serde_json::Value = serde_json::from_slice(body).unwrap();
//! let signature = compute_signature(b"test-secret", &canonicalize(&value));
//!
//! let payload = process_notification(body, &signature, b"test-secret").unwrap();
//! assert!(payload.is_finished());
//! ```

mod canonical;
mod payload;
mod signature;

pub use canonical::{Canonical, canonicalize, canonicalize_object};
pub use payload::{IpnPayload, PaymentNotification, classify};
pub use signature::{compute_signature, signatures_match};

use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::error::ConfigurationError;

/// Header carrying the IPN signature.
pub const SIGNATURE_HEADER: &str = "x-nowpayments-sig";

/// Verifies a raw notification body and returns it on success.
///
/// Returns `None` if the body is not a JSON object or if `signature` does not
/// match the HMAC-SHA512 of its canonical form under `secret`. The returned
/// payload keeps the body's original key order.
#[must_use]
pub fn process_notification(
    body: &[u8],
    signature: &str,
    secret: impl AsRef<[u8]>,
) -> Option<IpnPayload> {
    let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) else {
        rejected();
        return None;
    };
    verify_object(object, signature, secret.as_ref())
}

/// Returns `true` if `signature` authenticates the raw notification body.
#[must_use]
pub fn verify_signature(body: &[u8], signature: &str, secret: impl AsRef<[u8]>) -> bool {
    process_notification(body, signature, secret).is_some()
}

/// Returns `true` if `signature` authenticates an already decoded value.
///
/// Unlike the body-based entry points this accepts any JSON value, not only
/// objects.
#[must_use]
pub fn verify_value(value: &Value, signature: &str, secret: impl AsRef<[u8]>) -> bool {
    let computed = compute_signature(secret.as_ref(), &canonicalize(value));
    signatures_match(signature, &computed)
}

/// [`process_notification`] using the IPN secret held by `config`.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingIpnSecret`] if `config` has no secret.
pub fn process_notification_with_config(
    config: &ClientConfig,
    body: &[u8],
    signature: &str,
) -> Result<Option<IpnPayload>, ConfigurationError> {
    let secret = config.require_ipn_secret()?;
    Ok(process_notification(body, signature, secret.as_bytes()))
}

/// [`verify_signature`] using the IPN secret held by `config`.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingIpnSecret`] if `config` has no secret.
pub fn verify_signature_with_config(
    config: &ClientConfig,
    body: &[u8],
    signature: &str,
) -> Result<bool, ConfigurationError> {
    let secret = config.require_ipn_secret()?;
    Ok(verify_signature(body, signature, secret.as_bytes()))
}

fn verify_object(object: Map<String, Value>, signature: &str, secret: &[u8]) -> Option<IpnPayload> {
    let computed = compute_signature(secret, &canonicalize_object(&object));
    if !signatures_match(signature, &computed) {
        rejected();
        return None;
    }

    #[cfg(feature = "telemetry")]
    tracing::debug!(outcome = "verified", "IPN notification accepted");

    Some(IpnPayload::new(object))
}

fn rejected() {
    #[cfg(feature = "telemetry")]
    tracing::debug!(outcome = "rejected", "IPN notification rejected");
}
