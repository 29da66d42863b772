//! Custodial sub-accounts (the `sub-partner` API).
//!
//! Balances move between sub-accounts and the merchant's master account,
//! which the API addresses as user id [`MASTER_ACCOUNT_ID`].

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::{amount, borrow_pairs, merge_options};
use crate::client::NowPaymentsClient;
use crate::constants::MASTER_ACCOUNT_ID;
use crate::error::ClientError;

const PAYMENT_REQUIRED: &[&str] = &["user_id", "currency"];
const TRANSFER_REQUIRED: &[&str] = &["from_id", "to_id", "currency", "amount"];
const WITHDRAW_REQUIRED: &[&str] = &["user_id", "currency", "amount"];

/// `sub-partner` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Custody<'a> {
    client: &'a NowPaymentsClient,
}

impl<'a> Custody<'a> {
    pub(crate) const fn new(client: &'a NowPaymentsClient) -> Self {
        Self { client }
    }

    /// `POST /sub-partner/balance`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn create_user(&self, data: &Value) -> Result<Value, ClientError> {
        self.client
            .post_path(&["sub-partner", "balance"], Some(data))
            .await
    }

    /// `GET /sub-partner/balance/{user}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_balance(&self, user_id: u64) -> Result<Value, ClientError> {
        let id = user_id.to_string();
        self.client
            .get_path(&["sub-partner", "balance", id.as_str()], &[])
            .await
    }

    /// `GET /sub-partner` with arbitrary filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_users(&self, filters: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.client.get_path(&["sub-partner"], filters).await
    }

    /// `POST /sub-partner/payment`. Requires `user_id` and `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn create_payment(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["sub-partner", "payment"], data, PAYMENT_REQUIRED, None)
            .await
    }

    /// `POST /sub-partner/transfer`. Requires `from_id`, `to_id`, `currency`
    /// and `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn transfer(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["sub-partner", "transfer"], data, TRANSFER_REQUIRED, None)
            .await
    }

    /// `GET /sub-partner/transfers` with arbitrary filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_transfers(&self, filters: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.client
            .get_path(&["sub-partner", "transfers"], filters)
            .await
    }

    /// `GET /sub-partner/transfer/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_transfer(&self, transfer_id: &str) -> Result<Value, ClientError> {
        self.client
            .get_path(&["sub-partner", "transfer", transfer_id], &[])
            .await
    }

    /// `POST /sub-partner/write-off`. Requires `user_id`, `currency` and `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn withdraw(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["sub-partner", "write-off"], data, WITHDRAW_REQUIRED, None)
            .await
    }

    /// Creates a sub-account, optionally tagged with the merchant's own id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn create_user_account(
        &self,
        external_id: Option<&str>,
        email: Option<&str>,
    ) -> Result<Value, ClientError> {
        let mut body = Map::new();
        if let Some(external_id) = external_id {
            body.insert("external_id".into(), external_id.into());
        }
        if let Some(email) = email {
            body.insert("email".into(), email.into());
        }
        self.create_user(&Value::Object(body)).await
    }

    /// Creates a deposit payment crediting a sub-account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn create_deposit_payment(
        &self,
        user_id: u64,
        currency: &str,
        deposit_amount: Option<Decimal>,
        track_id: Option<&str>,
    ) -> Result<Value, ClientError> {
        let mut body = Map::new();
        body.insert("user_id".into(), user_id.into());
        body.insert("currency".into(), currency.into());
        if let Some(deposit_amount) = deposit_amount {
            body.insert("amount".into(), amount(deposit_amount));
        }
        if let Some(track_id) = track_id {
            body.insert("track_id".into(), track_id.into());
        }
        self.create_payment(Value::Object(body)).await
    }

    /// Moves funds from one sub-account to another.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn transfer_between_users(
        &self,
        from_id: u64,
        to_id: u64,
        currency: &str,
        transfer_amount: Decimal,
    ) -> Result<Value, ClientError> {
        let mut body = Map::new();
        body.insert("from_id".into(), from_id.into());
        body.insert("to_id".into(), to_id.into());
        body.insert("currency".into(), currency.into());
        body.insert("amount".into(), amount(transfer_amount));
        self.transfer(Value::Object(body)).await
    }

    /// Moves funds from a sub-account to the master account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn transfer_to_master(
        &self,
        user_id: u64,
        currency: &str,
        transfer_amount: Decimal,
    ) -> Result<Value, ClientError> {
        self.transfer_between_users(user_id, MASTER_ACCOUNT_ID, currency, transfer_amount)
            .await
    }

    /// Moves funds from the master account to a sub-account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn transfer_from_master(
        &self,
        user_id: u64,
        currency: &str,
        transfer_amount: Decimal,
    ) -> Result<Value, ClientError> {
        self.transfer_between_users(MASTER_ACCOUNT_ID, user_id, currency, transfer_amount)
            .await
    }

    /// Withdraws a sub-account balance to an external address.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `options` is not an object or the request fails.
    pub async fn withdraw_to_address(
        &self,
        user_id: u64,
        currency: &str,
        withdraw_amount: Decimal,
        address: &str,
        options: Value,
    ) -> Result<Value, ClientError> {
        let mut base = Map::new();
        base.insert("user_id".into(), user_id.into());
        base.insert("currency".into(), currency.into());
        base.insert("amount".into(), amount(withdraw_amount));
        base.insert("address".into(), address.into());
        self.withdraw(merge_options(base, options)?).await
    }

    /// Writes off a sub-account balance to the master account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn withdraw_to_master(
        &self,
        user_id: u64,
        currency: &str,
        withdraw_amount: Decimal,
    ) -> Result<Value, ClientError> {
        let mut body = Map::new();
        body.insert("user_id".into(), user_id.into());
        body.insert("currency".into(), currency.into());
        body.insert("amount".into(), amount(withdraw_amount));
        self.withdraw(Value::Object(body)).await
    }

    /// Lists transfers involving one sub-account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_transfers_by_user(
        &self,
        user_id: u64,
        limit: u32,
        offset: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("id", user_id.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.list_transfers(&borrow_pairs(&query)).await
    }

    /// Lists transfers in the given state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_transfers_by_status(
        &self,
        status: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("status", status.to_owned()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.list_transfers(&borrow_pairs(&query)).await
    }
}
