//! Typed views of gateway responses.
//!
//! Only responses with a stable, documented shape are modelled here; other
//! endpoints return raw [`serde_json::Value`]. Every model keeps fields it does
//! not know about in `extra`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::status::{ConversionStatus, PaymentStatus, PayoutStatus};

/// Response of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    /// `"OK"` when the gateway is healthy.
    pub message: String,
}

impl ApiStatus {
    /// Returns `true` if the gateway reported itself healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.message.eq_ignore_ascii_case("ok")
    }
}

/// Response of `GET /currencies` and `GET /merchant/coins`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyList {
    /// Currency tickers, lowercase (e.g. `btc`).
    #[serde(default, alias = "selectedCurrencies")]
    pub currencies: Vec<Value>,
}

/// Response of `GET /min-amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinAmount {
    /// Source currency.
    pub currency_from: String,
    /// Target currency.
    pub currency_to: String,
    /// Smallest accepted amount in `currency_from`.
    pub min_amount: Decimal,
    /// The same amount in the merchant's fiat currency, if requested.
    #[serde(default)]
    pub fiat_equivalent: Option<Decimal>,
}

/// Response of `GET /estimate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    /// Source currency.
    pub currency_from: String,
    /// Amount in `currency_from`.
    pub amount_from: Decimal,
    /// Target currency.
    pub currency_to: String,
    /// Estimated amount in `currency_to`.
    pub estimated_amount: Decimal,
}

/// A payment as returned by `POST /payment` and `GET /payment/{id}`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Gateway identifier; sent as a string by some endpoints and a number by others.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub payment_id: u64,
    /// Current state.
    pub payment_status: PaymentStatus,
    /// Deposit address.
    #[serde(default)]
    pub pay_address: Option<String>,
    /// Invoice price.
    #[serde(default)]
    pub price_amount: Option<Decimal>,
    /// Currency of `price_amount`.
    #[serde(default)]
    pub price_currency: Option<String>,
    /// Amount the customer must send.
    #[serde(default)]
    pub pay_amount: Option<Decimal>,
    /// Currency of `pay_amount`.
    #[serde(default)]
    pub pay_currency: Option<String>,
    /// Amount actually received.
    #[serde(default)]
    pub actually_paid: Option<Decimal>,
    /// Merchant order identifier.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Merchant order description.
    #[serde(default)]
    pub order_description: Option<String>,
    /// Any other fields the gateway returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Extracts the `status` field of a payout response.
#[must_use]
pub fn payout_status(data: &Value) -> PayoutStatus {
    data.get("status")
        .map_or_else(|| PayoutStatus::Unrecognized(String::new()), PayoutStatus::from_json)
}

/// Extracts the `status` field of a conversion response.
#[must_use]
pub fn conversion_status(data: &Value) -> ConversionStatus {
    data.get("status").map_or_else(
        || ConversionStatus::Unrecognized(String::new()),
        ConversionStatus::from_json,
    )
}

/// Reads a decimal from a number or numeric string.
fn decimal_field(data: &Value, key: &str) -> Option<Decimal> {
    match data.get(key)? {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Exchange rate of a conversion response (`rate`).
#[must_use]
pub fn conversion_rate(data: &Value) -> Option<Decimal> {
    decimal_field(data, "rate")
}

/// Converted amount of a conversion response (`to_amount`).
#[must_use]
pub fn converted_amount(data: &Value) -> Option<Decimal> {
    decimal_field(data, "to_amount")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_payment_id_accepts_string_or_number() {
        let from_string: Payment = serde_json::from_value(json!({
            "payment_id": "5745459419",
            "payment_status": "waiting",
            "pay_address": "3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj",
            "price_amount": 3999.5,
            "price_currency": "usd",
            "pay_amount": "0.17070286",
            "pay_currency": "btc",
            "ipn_callback_url": "https://nowpayments.io"
        }))
        .unwrap();
        assert_eq!(from_string.payment_id, 5_745_459_419);
        assert_eq!(from_string.payment_status, PaymentStatus::Waiting);
        assert_eq!(
            from_string.pay_amount,
            Some(Decimal::from_str("0.17070286").unwrap())
        );
        assert_eq!(
            from_string.extra.get("ipn_callback_url"),
            Some(&json!("https://nowpayments.io"))
        );

        let from_number: Payment =
            serde_json::from_value(json!({"payment_id": 42, "payment_status": "finished"}))
                .unwrap();
        assert_eq!(from_number.payment_id, 42);
        assert!(from_number.payment_status.is_terminal());
    }

    #[test]
    fn test_api_status() {
        let status: ApiStatus = serde_json::from_value(json!({"message": "OK"})).unwrap();
        assert!(status.is_ok());
    }

    #[test]
    fn test_conversion_helpers() {
        let data = json!({"status": "completed", "rate": "15.5", "to_amount": 31});
        assert_eq!(conversion_status(&data), ConversionStatus::Completed);
        assert_eq!(conversion_rate(&data), Some(Decimal::from_str("15.5").unwrap()));
        assert_eq!(converted_amount(&data), Some(Decimal::from(31)));
        assert_eq!(conversion_rate(&json!({})), None);
    }

    #[test]
    fn test_payout_status_missing() {
        assert_eq!(
            payout_status(&json!({"id": "1"})),
            PayoutStatus::Unrecognized(String::new())
        );
        assert_eq!(payout_status(&json!({"status": "sending"})), PayoutStatus::Sending);
    }
}
