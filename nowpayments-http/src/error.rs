//! Error types for the REST client.

use nowpayments::{ConfigurationError, ValidationError};
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Errors returned by [`crate::NowPaymentsClient`] and its services.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client configuration is incomplete or invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The request body is missing required fields. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The gateway answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request body did not serialize to a JSON object.
    #[error("invalid request body: {0}")]
    InvalidBody(&'static str),

    /// The API key cannot be sent as an HTTP header value.
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey(#[source] reqwest::header::InvalidHeaderValue),

    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// HTTP transport error.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Failed to read the response body.
    #[error("Failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        /// Human-readable context.
        context: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A non-2xx response from the gateway.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    body: Value,
}

impl ApiError {
    /// Builds an error from a status code and the raw response text.
    ///
    /// The message is the body's `message` field when present, otherwise the
    /// status' canonical reason.
    #[must_use]
    pub fn from_response(status: StatusCode, text: &str) -> Self {
        let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| "HTTP request failed".to_owned());
        Self {
            status,
            message,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Error message reported by the gateway.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Parsed response body; `Null` if it was empty or not JSON.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}: {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_uses_body_message() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":400,"code":"INVALID_REQUEST_PARAMS","message":"pay_currency is invalid"}"#,
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "pay_currency is invalid");
        assert_eq!(err.body()["code"], json!("INVALID_REQUEST_PARAMS"));
        assert_eq!(err.to_string(), "API error 400: pay_currency is invalid");
    }

    #[test]
    fn test_api_error_falls_back_to_reason() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.message(), "Bad Gateway");
        assert_eq!(err.body(), &Value::Null);
    }
}
