//! Resource services.
//!
//! Each service is a cheap handle borrowing the [`NowPaymentsClient`]. Raw
//! operations take a JSON body, check its required fields, and return the
//! decoded response; convenience methods build the body from typed arguments.
//!
//! [`NowPaymentsClient`]: crate::NowPaymentsClient

mod conversions;
mod custody;
mod general;
mod ipn;
mod payments;
mod payouts;
mod subscriptions;

pub use conversions::Conversions;
pub use custody::Custody;
pub use general::General;
pub use ipn::Ipn;
pub use payments::Payments;
pub use payouts::Payouts;
pub use subscriptions::Subscriptions;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::error::ClientError;

/// Encodes a decimal amount as a JSON number.
///
/// Falls back to a string if the value has no `f64` representation.
pub(crate) fn amount(value: Decimal) -> Value {
    let text = value.normalize().to_string();
    Number::from_str(&text).map_or(Value::String(text), Value::Number)
}

/// Overlays caller `options` onto `base`, keys in `options` winning.
///
/// `options` must be a JSON object or `null`.
pub(crate) fn merge_options(mut base: Map<String, Value>, options: Value) -> Result<Value, ClientError> {
    match options {
        Value::Null => {}
        Value::Object(extra) => base.extend(extra),
        _ => return Err(ClientError::InvalidBody("options must be a JSON object")),
    }
    Ok(Value::Object(base))
}

/// Borrows owned query values for the request helpers.
pub(crate) fn borrow_pairs<'a>(pairs: &'a [(&'a str, String)]) -> Vec<(&'a str, &'a str)> {
    pairs.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::MockServer;

    use crate::NowPaymentsClient;
    use nowpayments::ClientConfig;

    pub(crate) const API_KEY: &str = "test-api-key";

    pub(crate) fn client_for(server: &MockServer) -> NowPaymentsClient {
        let config = ClientConfig::new(API_KEY)
            .unwrap()
            .with_base_url(format!("{}/v1", server.uri()));
        NowPaymentsClient::new(config).unwrap()
    }
}
