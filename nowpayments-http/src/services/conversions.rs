//! Currency conversions inside the custody balance.

use nowpayments::ConversionStatus;
use nowpayments::models::{conversion_rate, conversion_status};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::{amount, borrow_pairs};
use crate::client::NowPaymentsClient;
use crate::error::ClientError;

const CONVERSION_REQUIRED: &[&str] = &["from_currency", "to_currency", "amount"];

/// `conversion` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Conversions<'a> {
    client: &'a NowPaymentsClient,
}

impl<'a> Conversions<'a> {
    pub(crate) const fn new(client: &'a NowPaymentsClient) -> Self {
        Self { client }
    }

    /// `POST /conversion`. Requires `from_currency`, `to_currency` and `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn create(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["conversion"], data, CONVERSION_REQUIRED, None)
            .await
    }

    /// `GET /conversion/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_status(&self, conversion_id: &str) -> Result<Value, ClientError> {
        self.client
            .get_path(&["conversion", conversion_id], &[])
            .await
    }

    /// `GET /conversion` with arbitrary filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.client.get_path(&["conversion"], filters).await
    }

    /// Converts `conversion_amount` of `from_currency` into `to_currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn create_conversion(
        &self,
        from_currency: &str,
        to_currency: &str,
        conversion_amount: Decimal,
    ) -> Result<Value, ClientError> {
        let mut body = Map::new();
        body.insert("from_currency".into(), from_currency.into());
        body.insert("to_currency".into(), to_currency.into());
        body.insert("amount".into(), amount(conversion_amount));
        self.create(Value::Object(body)).await
    }

    /// BTC to ETH.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn convert_btc_to_eth(&self, btc: Decimal) -> Result<Value, ClientError> {
        self.create_conversion("btc", "eth", btc).await
    }

    /// ETH to BTC.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn convert_eth_to_btc(&self, eth: Decimal) -> Result<Value, ClientError> {
        self.create_conversion("eth", "btc", eth).await
    }

    /// BTC to USDT.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn convert_btc_to_usdt(&self, btc: Decimal) -> Result<Value, ClientError> {
        self.create_conversion("btc", "usdt", btc).await
    }

    /// ETH to USDT.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn convert_eth_to_usdt(&self, eth: Decimal) -> Result<Value, ClientError> {
        self.create_conversion("eth", "usdt", eth).await
    }

    /// USDT to BTC.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn convert_usdt_to_btc(&self, usdt: Decimal) -> Result<Value, ClientError> {
        self.create_conversion("usdt", "btc", usdt).await
    }

    /// USDT to ETH.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn convert_usdt_to_eth(&self, usdt: Decimal) -> Result<Value, ClientError> {
        self.create_conversion("usdt", "eth", usdt).await
    }

    /// Lists conversions in the given state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_status(
        &self,
        status: &ConversionStatus,
        limit: u32,
        offset: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("status", status.as_str().to_owned()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Lists conversions involving `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_currency(
        &self,
        currency: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("currency", currency.to_owned()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Fetches a conversion and classifies its `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn status(&self, conversion_id: &str) -> Result<ConversionStatus, ClientError> {
        Ok(conversion_status(&self.get_status(conversion_id).await?))
    }

    /// Returns `true` if the conversion is `completed`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn is_completed(&self, conversion_id: &str) -> Result<bool, ClientError> {
        Ok(self.status(conversion_id).await? == ConversionStatus::Completed)
    }

    /// Returns `true` if the conversion is `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn is_pending(&self, conversion_id: &str) -> Result<bool, ClientError> {
        Ok(self.status(conversion_id).await? == ConversionStatus::Pending)
    }

    /// Returns `true` if the conversion is `failed`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn is_failed(&self, conversion_id: &str) -> Result<bool, ClientError> {
        Ok(self.status(conversion_id).await? == ConversionStatus::Failed)
    }

    /// Exchange rate of a conversion response.
    #[must_use]
    pub fn rate(data: &Value) -> Option<Decimal> {
        conversion_rate(data)
    }

    /// Amount credited by a conversion response (`to_amount`).
    #[must_use]
    pub fn converted_amount(data: &Value) -> Option<Decimal> {
        nowpayments::models::converted_amount(data)
    }
}
