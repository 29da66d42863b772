//! Recurring payments: plans and the subscriptions attached to them.

use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use super::{amount, borrow_pairs, merge_options};
use crate::client::NowPaymentsClient;
use crate::error::ClientError;

const PLAN_REQUIRED: &[&str] = &["title", "interval_day", "amount", "currency"];
const SUBSCRIPTION_REQUIRED: &[&str] = &["plan_id", "email"];

/// `subscriptions` and `subscriptions/plans` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Subscriptions<'a> {
    client: &'a NowPaymentsClient,
}

impl<'a> Subscriptions<'a> {
    pub(crate) const fn new(client: &'a NowPaymentsClient) -> Self {
        Self { client }
    }

    /// `POST /subscriptions/plans`. Requires `title`, `interval_day`, `amount`
    /// and `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn create_plan(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["subscriptions", "plans"], data, PLAN_REQUIRED, None)
            .await
    }

    /// `PATCH /subscriptions/plans/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn update_plan(&self, plan_id: &str, data: &Value) -> Result<Value, ClientError> {
        self.client
            .patch_path(&["subscriptions", "plans", plan_id], data)
            .await
    }

    /// `GET /subscriptions/plans/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_plan(&self, plan_id: &str) -> Result<Value, ClientError> {
        self.client
            .get_path(&["subscriptions", "plans", plan_id], &[])
            .await
    }

    /// `GET /subscriptions/plans`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_plans(&self) -> Result<Value, ClientError> {
        self.client.get_path(&["subscriptions", "plans"], &[]).await
    }

    /// `POST /subscriptions`. Requires `plan_id` and `email`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn create(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["subscriptions"], data, SUBSCRIPTION_REQUIRED, None)
            .await
    }

    /// `GET /subscriptions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get(&self, subscription_id: &str) -> Result<Value, ClientError> {
        self.client
            .get_path(&["subscriptions", subscription_id], &[])
            .await
    }

    /// `GET /subscriptions` with arbitrary filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.client.get_path(&["subscriptions"], filters).await
    }

    /// `DELETE /subscriptions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn cancel(&self, subscription_id: &str) -> Result<Value, ClientError> {
        self.client
            .delete_path(&["subscriptions", subscription_id])
            .await
    }

    /// Creates a plan billed every `interval_day` days.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `options` is not an object or the request fails.
    pub async fn create_subscription_plan(
        &self,
        title: &str,
        interval_day: u32,
        plan_amount: Decimal,
        currency: &str,
        options: Value,
    ) -> Result<Value, ClientError> {
        let mut base = Map::new();
        base.insert("title".into(), title.into());
        base.insert("interval_day".into(), interval_day.into());
        base.insert("amount".into(), amount(plan_amount));
        base.insert("currency".into(), currency.into());
        self.create_plan(merge_options(base, options)?).await
    }

    /// Subscribes `email` to a plan.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `options` is not an object or the request fails.
    pub async fn create_subscription(
        &self,
        plan_id: &str,
        email: &str,
        options: Value,
    ) -> Result<Value, ClientError> {
        let mut base = Map::new();
        base.insert("plan_id".into(), plan_id.into());
        base.insert("email".into(), email.into());
        self.create(merge_options(base, options)?).await
    }

    /// Lists the subscriptions of one plan.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_plan(
        &self,
        plan_id: &str,
        limit: u32,
        page: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("plan_id", plan_id.to_owned()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Lists subscriptions in the given state (e.g. `PAID`, `WAITING_PAY`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_status(
        &self,
        status: &str,
        limit: u32,
        page: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("status", status.to_owned()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Changes the amount billed by a plan.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn update_plan_amount(
        &self,
        plan_id: &str,
        plan_amount: Decimal,
    ) -> Result<Value, ClientError> {
        self.update_plan(plan_id, &json!({ "amount": amount(plan_amount) }))
            .await
    }

    /// Changes the billing interval of a plan.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn update_plan_interval(
        &self,
        plan_id: &str,
        interval_day: u32,
    ) -> Result<Value, ClientError> {
        self.update_plan(plan_id, &json!({ "interval_day": interval_day }))
            .await
    }
}
