//! Deterministic JSON re-encoding used as the HMAC input.
//!
//! Object keys are emitted in ascending byte order at every nesting level.
//! Arrays keep their element order. Numbers are written back with the exact
//! text they were decoded from (`serde_json/arbitrary_precision`), so
//! `0.00000123` never turns into `1.23e-6`. Strings use the standard compact
//! JSON escaping.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Borrowing view of a [`Value`] that serializes with sorted object keys.
///
/// The wrapped value is never cloned or mutated; the caller keeps the
/// original key order.
#[derive(Debug, Clone, Copy)]
pub struct Canonical<'a>(pub &'a Value);

impl Serialize for Canonical<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => SortedObject(map).serialize(serializer),
            Value::Array(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(&Canonical(item))?;
                }
                out.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

/// An object serialized with its keys in ascending byte order.
struct SortedObject<'a>(&'a Map<String, Value>);

impl Serialize for SortedObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&String, &Value)> = self.0.iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
        let mut out = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            out.serialize_entry(key, &Canonical(value))?;
        }
        out.end()
    }
}

/// Returns the canonical byte encoding of `value`.
///
/// # Panics
///
/// Never in practice: `Value` keys are always strings and the sink is a `Vec`.
#[must_use]
pub fn canonicalize(value: &Value) -> Vec<u8> {
    serde_json::to_vec(&Canonical(value)).expect("JSON value serialization is infallible")
}

/// Returns the canonical byte encoding of a JSON object.
///
/// # Panics
///
/// Never in practice, see [`canonicalize`].
#[must_use]
pub fn canonicalize_object(object: &Map<String, Value>) -> Vec<u8> {
    serde_json::to_vec(&SortedObject(object)).expect("JSON object serialization is infallible")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical_str(value: &Value) -> String {
        String::from_utf8(canonicalize(value)).unwrap()
    }

    #[test]
    fn test_top_level_keys_are_sorted() {
        let value: Value = serde_json::from_str(
            r#"{"price_currency":"USD","payment_status":"finished","price_amount":100,"payment_id":123}"#,
        )
        .unwrap();
        assert_eq!(
            canonical_str(&value),
            r#"{"payment_id":123,"payment_status":"finished","price_amount":100,"price_currency":"USD"}"#
        );
    }

    #[test]
    fn test_original_order_is_untouched() {
        let value: Value = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
        let _ = canonicalize(&value);
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_key_order_invariance() {
        let a: Value = serde_json::from_str(r#"{"x":1,"y":"two","z":[3]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"z":[3],"x":1,"y":"two"}"#).unwrap();
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }

    #[test]
    fn test_deterministic() {
        let value = json!({"k": "v", "n": 1.5, "a": null});
        assert_eq!(canonicalize(&value), canonicalize(&value));
    }

    #[test]
    fn test_nested_objects_sorted_arrays_preserved() {
        let value: Value =
            serde_json::from_str(r#"{"outer":{"b":true,"a":[3,1,{"d":0,"c":1}]},"first":null}"#)
                .unwrap();
        assert_eq!(
            canonical_str(&value),
            r#"{"first":null,"outer":{"a":[3,1,{"c":1,"d":0}],"b":true}}"#
        );
    }

    #[test]
    fn test_numbers_keep_their_type() {
        let value: Value =
            serde_json::from_str(r#"{"int":123,"neg":-7,"float":0.5,"zero":0}"#).unwrap();
        assert_eq!(
            canonical_str(&value),
            r#"{"float":0.5,"int":123,"neg":-7,"zero":0}"#
        );
    }

    #[test]
    fn test_number_text_is_preserved() {
        for raw in [
            r#"{"actually_paid":0.00000123,"payment_id":1}"#,
            r#"{"actually_paid":0.0000045,"payment_id":1}"#,
            r#"{"outcome_amount":100000000000000000000,"payment_id":1}"#,
            r#"{"commission_fee":1.50,"payment_id":12345678901234567890123}"#,
        ] {
            let value: Value = serde_json::from_str(raw).unwrap();
            assert_eq!(canonical_str(&value), raw);
        }
    }

    #[test]
    fn test_string_escaping() {
        let value: Value =
            serde_json::from_str(r#"{"s":"quote\" slash/ tab\t unié nl\n"}"#).unwrap();
        assert_eq!(
            canonical_str(&value),
            "{\"s\":\"quote\\\" slash/ tab\\t uni\u{e9} nl\\n\"}"
        );
    }

    #[test]
    fn test_keys_sort_bytewise() {
        let value = json!({"b": 1, "B": 2, "a_b": 3, "ab": 4});
        assert_eq!(canonical_str(&value), r#"{"B":2,"a_b":3,"ab":4,"b":1}"#);
    }

    #[test]
    fn test_object_and_value_forms_agree() {
        let value = json!({"z": 1, "a": {"y": 2, "b": 3}});
        assert_eq!(
            canonicalize(&value),
            canonicalize_object(value.as_object().unwrap())
        );
    }

    #[test]
    fn test_scalar_top_level() {
        assert_eq!(canonical_str(&json!("plain")), r#""plain""#);
        assert_eq!(canonical_str(&json!(42)), "42");
    }
}
