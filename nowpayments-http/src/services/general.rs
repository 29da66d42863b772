//! API status, currency lists, and price estimates.

use nowpayments::models::{ApiStatus, CurrencyList, Estimate, MinAmount};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::client::NowPaymentsClient;
use crate::error::ClientError;

/// Endpoints that need no resource id.
#[derive(Debug, Clone, Copy)]
pub struct General<'a> {
    client: &'a NowPaymentsClient,
}

impl<'a> General<'a> {
    pub(crate) const fn new(client: &'a NowPaymentsClient) -> Self {
        Self { client }
    }

    /// `GET /status`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn status(&self) -> Result<ApiStatus, ClientError> {
        self.client.get_typed(&["status"], &[]).await
    }

    /// `GET /currencies`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn currencies(&self) -> Result<CurrencyList, ClientError> {
        self.client.get_typed(&["currencies"], &[]).await
    }

    /// `GET /merchant/coins`: the currencies enabled for this merchant.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn merchant_currencies(&self) -> Result<CurrencyList, ClientError> {
        self.client.get_typed(&["merchant", "coins"], &[]).await
    }

    /// `GET /full-currencies`, with network and logo details per currency.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn full_currencies(&self) -> Result<Value, ClientError> {
        self.client.get_path(&["full-currencies"], &[]).await
    }

    /// `GET /min-amount` for a currency pair.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn min_amount(
        &self,
        currency_from: &str,
        currency_to: &str,
    ) -> Result<MinAmount, ClientError> {
        self.client
            .get_typed(
                &["min-amount"],
                &[("currency_from", currency_from), ("currency_to", currency_to)],
            )
            .await
    }

    /// `GET /estimate`: the price of `amount` in another currency.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn estimate(
        &self,
        amount: Decimal,
        currency_from: &str,
        currency_to: &str,
    ) -> Result<Estimate, ClientError> {
        let amount = amount.normalize().to_string();
        self.client
            .get_typed(
                &["estimate"],
                &[
                    ("amount", amount.as_str()),
                    ("currency_from", currency_from),
                    ("currency_to", currency_to),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{API_KEY, client_for};
    use serde_json::json;
    use std::str::FromStr;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_status_and_currencies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/status"))
            .and(header("x-api-key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"currencies": ["btc", "eth"]})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/merchant/coins"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"selectedCurrencies": ["BTC"]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/full-currencies"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"currencies": [{"code": "BTC"}]})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.status().await.unwrap().is_ok());
        assert_eq!(
            client.currencies().await.unwrap().currencies,
            vec![json!("btc"), json!("eth")]
        );
        assert_eq!(
            client.merchant_currencies().await.unwrap().currencies,
            vec![json!("BTC")]
        );
        let full = client.general().full_currencies().await.unwrap();
        assert_eq!(full["currencies"][0]["code"], json!("BTC"));
    }

    #[tokio::test]
    async fn test_min_amount_and_estimate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/min-amount"))
            .and(query_param("currency_from", "eth"))
            .and(query_param("currency_to", "trx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "currency_from": "eth",
                "currency_to": "trx",
                "min_amount": "0.0078999"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/estimate"))
            .and(query_param("amount", "3999.5"))
            .and(query_param("currency_from", "usd"))
            .and(query_param("currency_to", "btc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "currency_from": "usd",
                "amount_from": 3999.5,
                "currency_to": "btc",
                "estimated_amount": "0.17061637"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let general = client.general();
        let min = general.min_amount("eth", "trx").await.unwrap();
        assert_eq!(min.min_amount, Decimal::from_str("0.0078999").unwrap());
        assert_eq!(min.fiat_equivalent, None);

        let estimate = general
            .estimate(Decimal::new(39995, 1), "usd", "btc")
            .await
            .unwrap();
        assert_eq!(
            estimate.estimated_amount,
            Decimal::from_str("0.17061637").unwrap()
        );
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/status"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "status": false,
                "statusCode": 403,
                "code": "INVALID_API_KEY",
                "message": "Invalid api key"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.status().await.unwrap_err();
        let ClientError::Api(api) = err else {
            panic!("expected API error, got {err:?}");
        };
        assert_eq!(api.status().as_u16(), 403);
        assert_eq!(api.message(), "Invalid api key");
    }
}
