//! Verified IPN payloads and their fixed-field projection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Deref;

use crate::status::PaymentStatus;

/// A notification body whose signature has been verified.
///
/// Holds the object exactly as the gateway sent it, in its original key
/// order. Only [`super::process_notification`] and its variants construct one
/// from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpnPayload(Map<String, Value>);

impl IpnPayload {
    pub(crate) const fn new(object: Map<String, Value>) -> Self {
        Self(object)
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrows the underlying JSON object.
    #[must_use]
    pub const fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Classifies `payment_status`. A missing, empty, or unknown value maps to
    /// [`PaymentStatus::Unrecognized`].
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        classify(&self.0)
    }

    /// Projects the payload onto the known payment fields.
    #[must_use]
    pub fn notification(&self) -> PaymentNotification {
        PaymentNotification::from_object(&self.0)
    }

    /// `payment_status` is `waiting`.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.status().is_waiting()
    }

    /// `payment_status` is `confirming`.
    #[must_use]
    pub fn is_confirming(&self) -> bool {
        self.status().is_confirming()
    }

    /// `payment_status` is `confirmed`.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status().is_confirmed()
    }

    /// `payment_status` is `partially_paid`.
    #[must_use]
    pub fn is_partially_paid(&self) -> bool {
        self.status().is_partially_paid()
    }

    /// `payment_status` is `finished`.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    /// `payment_status` is `failed`.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status().is_failed()
    }

    /// `payment_status` is `expired`.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.status().is_expired()
    }
}

impl Deref for IpnPayload {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<IpnPayload> for Value {
    fn from(payload: IpnPayload) -> Self {
        Self::Object(payload.0)
    }
}

/// Maps the `payment_status` field of a decoded object to a [`PaymentStatus`].
#[must_use]
pub fn classify(object: &Map<String, Value>) -> PaymentStatus {
    object
        .get("payment_status")
        .map_or_else(|| PaymentStatus::Unrecognized(String::new()), PaymentStatus::from_json)
}

/// The payment attributes an IPN may carry.
///
/// Every field is always present; a key the payload lacked is `None` and
/// serializes as `null`. Values are kept as raw JSON because the gateway is
/// inconsistent about sending amounts and identifiers as numbers or strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentNotification {
    /// Gateway payment identifier.
    pub payment_id: Option<Value>,
    /// Raw `payment_status` value.
    pub payment_status: Option<Value>,
    /// Deposit address shown to the customer.
    pub pay_address: Option<Value>,
    /// Invoice price.
    pub price_amount: Option<Value>,
    /// Currency of `price_amount`.
    pub price_currency: Option<Value>,
    /// Amount the customer is asked to pay.
    pub pay_amount: Option<Value>,
    /// Currency of `pay_amount`.
    pub pay_currency: Option<Value>,
    /// Merchant order identifier.
    pub order_id: Option<Value>,
    /// Merchant order description.
    pub order_description: Option<Value>,
    /// Purchase identifier grouping repeated payments.
    pub purchase_id: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
    /// Last update timestamp.
    pub updated_at: Option<Value>,
    /// Amount credited to the merchant.
    pub outcome_amount: Option<Value>,
    /// Currency of `outcome_amount`.
    pub outcome_currency: Option<Value>,
    /// Amount actually received.
    pub actually_paid: Option<Value>,
    /// Gateway fee.
    pub commission_fee: Option<Value>,
}

impl PaymentNotification {
    /// Field names in projection order.
    pub const FIELDS: [&'static str; 16] = [
        "payment_id",
        "payment_status",
        "pay_address",
        "price_amount",
        "price_currency",
        "pay_amount",
        "pay_currency",
        "order_id",
        "order_description",
        "purchase_id",
        "created_at",
        "updated_at",
        "outcome_amount",
        "outcome_currency",
        "actually_paid",
        "commission_fee",
    ];

    /// Projects a decoded object onto the known fields. Never fails.
    ///
    /// An explicit JSON `null` is treated the same as a missing key.
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let field = |name: &str| object.get(name).filter(|v| !v.is_null()).cloned();
        Self {
            payment_id: field("payment_id"),
            payment_status: field("payment_status"),
            pay_address: field("pay_address"),
            price_amount: field("price_amount"),
            price_currency: field("price_currency"),
            pay_amount: field("pay_amount"),
            pay_currency: field("pay_currency"),
            order_id: field("order_id"),
            order_description: field("order_description"),
            purchase_id: field("purchase_id"),
            created_at: field("created_at"),
            updated_at: field("updated_at"),
            outcome_amount: field("outcome_amount"),
            outcome_currency: field("outcome_currency"),
            actually_paid: field("actually_paid"),
            commission_fee: field("commission_fee"),
        }
    }

    /// Classifies the projected `payment_status`.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        self.payment_status
            .as_ref()
            .map_or_else(|| PaymentStatus::Unrecognized(String::new()), PaymentStatus::from_json)
    }
}
