//! The REST client and its request helpers.
//!
//! [`NowPaymentsClient`] owns the [`ClientConfig`], a shared `reqwest` client,
//! and the default headers (`x-api-key`, `Accept`, `User-Agent`). Resource
//! services borrow it, so creating a service handle costs nothing.
//!
//! ## Error Handling
//!
//! - Missing required body fields fail with [`ClientError::Validation`]
//!   before anything is sent
//! - Non-2xx responses become [`ClientError::Api`] carrying the status and
//!   the parsed body
//! - Transport and decoding failures keep the request line as context

use std::fmt::Display;
use std::sync::Arc;

use nowpayments::ClientConfig;
use nowpayments::models::{ApiStatus, CurrencyList};
use nowpayments::validation::require_fields;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::constants;
use crate::error::{ApiError, ClientError};
use crate::services::{Conversions, Custody, General, Ipn, Payments, Payouts, Subscriptions};

/// Async client for the NOWPayments REST API.
///
/// # Example
///
/// ```no_run
/// use nowpayments::ClientConfig;
/// use nowpayments_http::NowPaymentsClient;
/// use rust_decimal::Decimal;
///
/// # async fn run() -> Result<(), nowpayments_http::ClientError> {
/// let config = ClientConfig::new("my-api-key")?.with_sandbox(true);
/// let client = NowPaymentsClient::new(config)?;
///
/// let status = client.status().await?;
/// assert!(status.is_ok());
///
/// let payment = client
///     .payments()
///     .create_payment(Decimal::new(100, 0), "usd", "btc", serde_json::json!({"order_id": "A-1"}))
///     .await?;
/// assert!(payment.pay_address.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct NowPaymentsClient {
    config: Arc<ClientConfig>,
    /// Base URL with a trailing slash, e.g. `https://api.nowpayments.io/v1/`
    base_url: Url,
    client: Client,
    headers: HeaderMap,
}

impl NowPaymentsClient {
    /// Creates a client with a new `reqwest` client using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the base URL or API key is unusable or the
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Http {
                context: "Failed to build HTTP client".to_owned(),
                source: e,
            })?;
        Self::with_http_client(config, client)
    }

    /// Creates a client on top of a pre-configured `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the base URL or API key is unusable.
    pub fn with_http_client(config: ClientConfig, client: Client) -> Result<Self, ClientError> {
        let mut normalized = config.base_url().to_owned();
        normalized.push('/');
        let base_url = Url::parse(&normalized).map_err(|e| ClientError::UrlParse {
            context: format!("Failed to parse base url {normalized}"),
            source: e,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::UrlParse {
                context: format!("Base url {normalized} cannot carry a path"),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        let mut api_key =
            HeaderValue::from_str(config.api_key()).map_err(ClientError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(constants::API_KEY_HEADER), api_key);

        Ok(Self {
            config: Arc::new(config),
            base_url,
            client,
            headers,
        })
    }

    /// Creates a client from `NOWPAYMENTS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the variables are missing or
    /// invalid.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the base URL, with a trailing slash.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Payments and invoices.
    #[must_use]
    pub const fn payments(&self) -> Payments<'_> {
        Payments::new(self)
    }

    /// Recurring-payment plans and subscriptions.
    #[must_use]
    pub const fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(self)
    }

    /// Mass payouts.
    #[must_use]
    pub const fn payouts(&self) -> Payouts<'_> {
        Payouts::new(self)
    }

    /// Custodial sub-accounts.
    #[must_use]
    pub const fn custody(&self) -> Custody<'_> {
        Custody::new(self)
    }

    /// Currency conversions.
    #[must_use]
    pub const fn conversions(&self) -> Conversions<'_> {
        Conversions::new(self)
    }

    /// Status, currencies, and estimates.
    #[must_use]
    pub const fn general(&self) -> General<'_> {
        General::new(self)
    }

    /// IPN verification bound to this client's secret.
    #[must_use]
    pub const fn ipn(&self) -> Ipn<'_> {
        Ipn::new(self)
    }

    /// Shortcut for [`General::status`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn status(&self) -> Result<ApiStatus, ClientError> {
        self.general().status().await
    }

    /// Shortcut for [`General::currencies`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn currencies(&self) -> Result<CurrencyList, ClientError> {
        self.general().currencies().await
    }

    /// Shortcut for [`General::merchant_currencies`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn merchant_currencies(&self) -> Result<CurrencyList, ClientError> {
        self.general().merchant_currencies().await
    }

    /// Sends `GET {base}/{endpoint}?{query}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, a non-2xx status, or a
    /// non-JSON response.
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.execute(Method::GET, &split_endpoint(endpoint), query, None, None)
            .await
    }

    /// Sends `POST {base}/{endpoint}` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failure, a
    /// non-2xx status, or a non-JSON response.
    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ClientError::Serialize)?;
        self.execute(Method::POST, &split_endpoint(endpoint), &[], Some(&body), None)
            .await
    }

    /// Sends `PATCH {base}/{endpoint}` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failure, a
    /// non-2xx status, or a non-JSON response.
    pub async fn patch<B>(&self, endpoint: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ClientError::Serialize)?;
        self.execute(Method::PATCH, &split_endpoint(endpoint), &[], Some(&body), None)
            .await
    }

    /// Sends `DELETE {base}/{endpoint}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, a non-2xx status, or a
    /// non-JSON response.
    pub async fn delete(&self, endpoint: &str) -> Result<Value, ClientError> {
        self.execute(Method::DELETE, &split_endpoint(endpoint), &[], None, None)
            .await
    }

    /// `GET` with path segments that are percent-encoded individually.
    pub(crate) async fn get_path(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Value, ClientError> {
        self.execute(Method::GET, path, query, None, None).await
    }

    /// Typed variant of [`Self::get_path`].
    pub(crate) async fn get_typed<R>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let value = self.get_path(path, query).await?;
        decode(value, &Method::GET, path)
    }

    /// `POST` with an optional body and no validation.
    pub(crate) async fn post_path(
        &self,
        path: &[&str],
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        self.execute(Method::POST, path, &[], body, None).await
    }

    /// `PATCH` to a segmented path.
    pub(crate) async fn patch_path(&self, path: &[&str], body: &Value) -> Result<Value, ClientError> {
        self.execute(Method::PATCH, path, &[], Some(body), None).await
    }

    /// `DELETE` to a segmented path.
    pub(crate) async fn delete_path(&self, path: &[&str]) -> Result<Value, ClientError> {
        self.execute(Method::DELETE, path, &[], None, None).await
    }

    /// `POST` after checking that `required` fields are present in `body`.
    pub(crate) async fn post_required(
        &self,
        path: &[&str],
        body: Value,
        required: &[&str],
        bearer: Option<&str>,
    ) -> Result<Value, ClientError> {
        let object = into_object(body)?;
        require_fields(&object, required)?;
        self.execute(Method::POST, path, &[], Some(&Value::Object(object)), bearer)
            .await
    }

    /// Typed variant of [`Self::post_required`].
    pub(crate) async fn post_required_typed<R>(
        &self,
        path: &[&str],
        body: Value,
        required: &[&str],
    ) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let value = self.post_required(path, body, required, None).await?;
        decode(value, &Method::POST, path)
    }

    /// Sends one request and maps the response.
    ///
    /// A 2xx response with an empty body (or a JSON `null`) yields an empty
    /// object.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "nowpayments.request",
            skip_all,
            fields(
                http.method = %method,
                endpoint = %path.join("/"),
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    async fn execute(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<Value, ClientError> {
        let context = request_line(&method, path);
        let url = self.endpoint_url(path, query, &context)?;

        let mut req = self.client.request(method, url).headers(self.headers.clone());
        if let Some(token) = bearer {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidBody("auth_token is not a valid header value"))?;
            value.set_sensitive(true);
            req = req.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let result = async {
            let response = req.send().await.map_err(|e| ClientError::Http {
                context: context.clone(),
                source: e,
            })?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| ClientError::ResponseBodyRead {
                    context: context.clone(),
                    source: e,
                })?;
            if status.is_success() {
                parse_body(&text).map_err(|e| ClientError::JsonDeserialization {
                    context: context.clone(),
                    source: e,
                })
            } else {
                Err(ApiError::from_response(status, &text).into())
            }
        }
        .await;

        record_result_on_span(&result);

        result
    }

    fn endpoint_url(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::UrlParse {
                context: format!("Failed to construct URL for {context}"),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(path.iter().filter(|segment| !segment.is_empty()));
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

/// Splits a slash-separated endpoint into path segments.
fn split_endpoint(endpoint: &str) -> Vec<&str> {
    endpoint.split('/').filter(|s| !s.is_empty()).collect()
}

fn request_line(method: &Method, path: &[&str]) -> String {
    format!("{method} /{}", path.join("/"))
}

fn parse_body(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str(text)? {
        Value::Null => Ok(Value::Object(Map::new())),
        value => Ok(value),
    }
}

fn decode<R: DeserializeOwned>(value: Value, method: &Method, path: &[&str]) -> Result<R, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::JsonDeserialization {
        context: request_line(method, path),
        source: e,
    })
}

fn into_object(body: Value) -> Result<Map<String, Value>, ClientError> {
    match body {
        Value::Object(object) => Ok(object),
        _ => Err(ClientError::InvalidBody("request body must be a JSON object")),
    }
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to NOWPayments failed");
        }
    }
}

/// Records the outcome of a request on the current span.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}
