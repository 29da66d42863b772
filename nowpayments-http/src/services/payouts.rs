//! Mass payouts.
//!
//! Creating a payout needs a JWT obtained from `POST /auth`. Pass it as an
//! `auth_token` field in the body; it is moved into the `Authorization`
//! header before the request is sent.

use nowpayments::PayoutStatus;
use nowpayments::models::payout_status;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use super::{amount, borrow_pairs, merge_options};
use crate::client::NowPaymentsClient;
use crate::error::ClientError;

const PAYOUT_REQUIRED: &[&str] = &["withdrawals"];
const AUTH_TOKEN_FIELD: &str = "auth_token";

/// `payout` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Payouts<'a> {
    client: &'a NowPaymentsClient,
}

impl<'a> Payouts<'a> {
    pub(crate) const fn new(client: &'a NowPaymentsClient) -> Self {
        Self { client }
    }

    /// `POST /payout`. Requires `withdrawals`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if `withdrawals` is blank, or any
    /// transport or API error.
    pub async fn create(&self, data: Value) -> Result<Value, ClientError> {
        let Value::Object(mut object) = data else {
            return Err(ClientError::InvalidBody("request body must be a JSON object"));
        };
        let token = match object.remove(AUTH_TOKEN_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(token)) => Some(token),
            Some(other) => Some(other.to_string()),
        };
        self.client
            .post_required(
                &["payout"],
                Value::Object(object),
                PAYOUT_REQUIRED,
                token.as_deref(),
            )
            .await
    }

    /// `POST /payout/{batch}/verify` with the 2FA `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn verify(&self, batch_id: &str, code: &str) -> Result<Value, ClientError> {
        self.client
            .post_path(&["payout", batch_id, "verify"], Some(&json!({ "code": code })))
            .await
    }

    /// `GET /payout/{batch}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_status(&self, batch_id: &str) -> Result<Value, ClientError> {
        self.client.get_path(&["payout", batch_id], &[]).await
    }

    /// `GET /payout` with arbitrary filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.client.get_path(&["payout"], filters).await
    }

    /// `POST /payout/validate-address`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails, including when the
    /// gateway rejects the address.
    pub async fn validate_address(
        &self,
        address: &str,
        currency: &str,
        extra_id: Option<&str>,
    ) -> Result<Value, ClientError> {
        let mut body = Map::new();
        body.insert("address".into(), address.into());
        body.insert("currency".into(), currency.into());
        if let Some(extra_id) = extra_id {
            body.insert("extra_id".into(), extra_id.into());
        }
        self.client
            .post_path(&["payout", "validate-address"], Some(&Value::Object(body)))
            .await
    }

    /// Creates a batch from a list of withdrawals.
    ///
    /// `options` may carry `auth_token` and batch-level fields such as
    /// `ipn_callback_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `options` is not an object or the request fails.
    pub async fn create_payout(
        &self,
        withdrawals: Vec<Value>,
        options: Value,
    ) -> Result<Value, ClientError> {
        let mut base = Map::new();
        base.insert("withdrawals".into(), Value::Array(withdrawals));
        self.create(merge_options(base, options)?).await
    }

    /// Creates a batch with one withdrawal of `payout_amount` in `currency`.
    ///
    /// `options` is merged into the withdrawal itself.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `options` is not an object or the request fails.
    pub async fn create_single_payout(
        &self,
        address: &str,
        currency: &str,
        payout_amount: Decimal,
        options: Value,
    ) -> Result<Value, ClientError> {
        let mut base = Map::new();
        base.insert("address".into(), address.into());
        base.insert("currency".into(), currency.into());
        base.insert("amount".into(), amount(payout_amount));
        let withdrawal = merge_options(base, options)?;
        self.create_payout(vec![withdrawal], Value::Null).await
    }

    /// Creates a batch with one withdrawal priced in fiat.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `options` is not an object or the request fails.
    pub async fn create_payout_with_fiat_amount(
        &self,
        address: &str,
        currency: &str,
        fiat_amount: Decimal,
        fiat_currency: &str,
        options: Value,
    ) -> Result<Value, ClientError> {
        let mut base = Map::new();
        base.insert("address".into(), address.into());
        base.insert("currency".into(), currency.into());
        base.insert("fiat_amount".into(), amount(fiat_amount));
        base.insert("fiat_currency".into(), fiat_currency.into());
        let withdrawal = merge_options(base, options)?;
        self.create_payout(vec![withdrawal], Value::Null).await
    }

    /// Lists batches in the given state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_status(
        &self,
        status: &PayoutStatus,
        limit: u32,
        page: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("status", status.as_str().to_owned()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Lists batches created between two dates.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_date_range(
        &self,
        date_from: &str,
        date_to: &str,
        limit: u32,
        page: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("date_from", date_from.to_owned()),
            ("date_to", date_to.to_owned()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Fetches a batch and classifies its `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn status(&self, batch_id: &str) -> Result<PayoutStatus, ClientError> {
        Ok(payout_status(&self.get_status(batch_id).await?))
    }

    /// Returns `true` if the batch is `finished`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn is_finished(&self, batch_id: &str) -> Result<bool, ClientError> {
        Ok(self.status(batch_id).await? == PayoutStatus::Finished)
    }

    /// Returns `true` if the batch is `sending`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn is_sending(&self, batch_id: &str) -> Result<bool, ClientError> {
        Ok(self.status(batch_id).await? == PayoutStatus::Sending)
    }

    /// Returns `true` if the batch is `failed`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn is_failed(&self, batch_id: &str) -> Result<bool, ClientError> {
        Ok(self.status(batch_id).await? == PayoutStatus::Failed)
    }
}
