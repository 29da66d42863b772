//! IPN verification bound to a client.

use nowpayments::ipn::{self, IpnPayload};

use crate::client::NowPaymentsClient;
use crate::error::ClientError;

/// Verifies Instant Payment Notifications with an explicit secret or the one
/// held by the client configuration.
#[derive(Debug, Clone, Copy)]
pub struct Ipn<'a> {
    client: &'a NowPaymentsClient,
}

impl<'a> Ipn<'a> {
    pub(crate) const fn new(client: &'a NowPaymentsClient) -> Self {
        Self { client }
    }

    /// Returns `true` if `signature` authenticates `body` under `secret`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn verify_signature(&self, body: &[u8], signature: &str, secret: impl AsRef<[u8]>) -> bool {
        ipn::verify_signature(body, signature, secret)
    }

    /// Returns the verified notification, or `None` if it is malformed or
    /// its signature does not match.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn process(
        &self,
        body: &[u8],
        signature: &str,
        secret: impl AsRef<[u8]>,
    ) -> Option<IpnPayload> {
        ipn::process_notification(body, signature, secret)
    }

    /// [`Self::verify_signature`] with the client's IPN secret.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the client has no IPN secret.
    pub fn verify_signature_with_client_secret(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<bool, ClientError> {
        Ok(ipn::verify_signature_with_config(
            self.client.config(),
            body,
            signature,
        )?)
    }

    /// [`Self::process`] with the client's IPN secret.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the client has no IPN secret.
    pub fn process_with_client_secret(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<Option<IpnPayload>, ClientError> {
        Ok(ipn::process_notification_with_config(
            self.client.config(),
            body,
            signature,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nowpayments::ipn::{canonicalize, compute_signature};
    use nowpayments::{ClientConfig, ConfigurationError, PaymentStatus};
    use serde_json::Value;

    const SECRET: &str = "ipn-secret";
    const BODY: &[u8] = br#"{"payment_status":"partially_paid","payment_id":5077125051,"actually_paid":0.001}"#;

    fn signature() -> String {
        let value: Value = serde_json::from_slice(BODY).unwrap();
        compute_signature(SECRET.as_bytes(), &canonicalize(&value))
    }

    #[test]
    fn test_explicit_secret() {
        let client = NowPaymentsClient::new(ClientConfig::new("key").unwrap()).unwrap();
        let ipn = client.ipn();
        let signature = signature();

        assert!(ipn.verify_signature(BODY, &signature, SECRET));
        assert!(!ipn.verify_signature(BODY, &signature, "wrong"));

        let payload = ipn.process(BODY, &signature, SECRET).unwrap();
        assert_eq!(payload.status(), PaymentStatus::PartiallyPaid);
        assert!(payload.is_partially_paid());
        assert!(ipn.process(b"not json", &signature, SECRET).is_none());
    }

    #[test]
    fn test_client_secret() {
        let config = ClientConfig::new("key").unwrap().with_ipn_secret(SECRET);
        let client = NowPaymentsClient::new(config).unwrap();
        let signature = signature();

        assert!(
            client
                .ipn()
                .verify_signature_with_client_secret(BODY, &signature)
                .unwrap()
        );
        let payload = client
            .ipn()
            .process_with_client_secret(BODY, &signature)
            .unwrap()
            .unwrap();
        assert_eq!(payload.get("payment_id"), Some(&serde_json::json!(5_077_125_051_u64)));
    }

    #[test]
    fn test_missing_client_secret() {
        let client = NowPaymentsClient::new(ClientConfig::new("key").unwrap()).unwrap();
        let err = client
            .ipn()
            .process_with_client_secret(BODY, "00")
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Configuration(ConfigurationError::MissingIpnSecret)
        ));
        assert!(
            client
                .ipn()
                .verify_signature_with_client_secret(BODY, "00")
                .is_err()
        );
    }
}
