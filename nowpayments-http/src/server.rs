//! Helpers for IPN endpoints built on `http` types.
//!
//! Framework agnostic: anything that exposes an [`http::HeaderMap`] and the
//! raw body bytes (axum, hyper, tower services) can hand them over as-is.

use http::HeaderMap;
use nowpayments::ipn::{IpnPayload, process_notification};
use nowpayments::{ClientConfig, ConfigurationError};

use crate::constants::SIGNATURE_HEADER;

/// Returns the `x-nowpayments-sig` header value, if present and visible ASCII.
#[must_use]
pub fn signature_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(SIGNATURE_HEADER)?.to_str().ok()
}

/// Verifies an inbound IPN request.
///
/// A missing or non-ASCII signature header is treated like a bad signature.
#[must_use]
pub fn process_request(
    headers: &HeaderMap,
    body: &[u8],
    secret: impl AsRef<[u8]>,
) -> Option<IpnPayload> {
    let Some(signature) = signature_from_headers(headers) else {
        #[cfg(feature = "telemetry")]
        tracing::debug!(outcome = "rejected", "IPN notification rejected");
        return None;
    };
    process_notification(body, signature, secret)
}

/// [`process_request`] with the IPN secret held by `config`.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingIpnSecret`] if `config` has no secret.
pub fn process_request_with_config(
    config: &ClientConfig,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Option<IpnPayload>, ConfigurationError> {
    let secret = config.require_ipn_secret()?;
    Ok(process_request(headers, body, secret.as_bytes()))
}
