//! Required-field checks applied to request bodies before they are sent.

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Checks that every name in `required` is present and non-blank in `body`.
///
/// A field counts as missing when it is absent, `null`, `false`, `""`, `"0"`,
/// an empty array, an empty object, or a float zero such as `0.0`. Any integer,
/// including `0`, is considered present.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every missing field, in the order
/// given by `required`.
pub fn require_fields(body: &Map<String, Value>, required: &[&str]) -> Result<(), ValidationError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|field| body.get(*field).is_none_or(is_blank))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(missing))
    }
}

/// Returns `true` if `value` does not count as a supplied field.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.is_f64() && n.as_f64().is_some_and(|f| f == 0.0),
        Value::Bool(true) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_all_present() {
        let body = object(json!({"price_amount": 10, "price_currency": "usd", "pay_currency": "btc"}));
        assert!(require_fields(&body, &["price_amount", "price_currency", "pay_currency"]).is_ok());
    }

    #[test]
    fn test_missing_fields_reported_in_declared_order() {
        let body = object(json!({"price_currency": "usd"}));
        let err = require_fields(&body, &["price_amount", "price_currency", "pay_currency"])
            .unwrap_err();
        assert_eq!(err.missing_fields(), ["price_amount", "pay_currency"]);
        assert_eq!(
            err.to_string(),
            "Missing required fields: price_amount, pay_currency"
        );
    }

    #[test]
    fn test_zero_is_present() {
        let body = object(json!({"from_id": 0, "to_id": 5}));
        assert!(require_fields(&body, &["from_id", "to_id"]).is_ok());
    }

    #[test]
    fn test_float_zero_is_missing() {
        let body: Map<String, Value> =
            serde_json::from_str(r#"{"amount":0.0,"fee":-0.0,"rate":0.5,"count":0}"#).unwrap();
        let err = require_fields(&body, &["amount", "fee", "rate", "count"]).unwrap_err();
        assert_eq!(err.missing_fields(), ["amount", "fee"]);
    }

    #[test]
    fn test_blank_values_are_missing() {
        let body = object(json!({
            "a": null,
            "b": "",
            "c": [],
            "d": {},
            "e": false,
            "f": "0",
            "g": true,
        }));
        let err = require_fields(&body, &["a", "b", "c", "d", "e", "f", "g"]).unwrap_err();
        assert_eq!(err.missing_fields(), ["a", "b", "c", "d", "e", "f"]);
    }
}
