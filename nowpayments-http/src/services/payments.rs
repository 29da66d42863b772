//! Payments and invoices.

use nowpayments::PaymentStatus;
use nowpayments::models::Payment;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::{amount, borrow_pairs, merge_options};
use crate::client::NowPaymentsClient;
use crate::error::ClientError;

const CREATE_REQUIRED: &[&str] = &["price_amount", "price_currency", "pay_currency"];
const INVOICE_REQUIRED: &[&str] = &["price_amount", "price_currency", "order_id"];
const INVOICE_PAYMENT_REQUIRED: &[&str] = &["iid", "pay_currency"];

/// `payment`, `invoice` and `invoice-payment` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Payments<'a> {
    client: &'a NowPaymentsClient,
}

impl<'a> Payments<'a> {
    pub(crate) const fn new(client: &'a NowPaymentsClient) -> Self {
        Self { client }
    }

    /// `POST /payment`. Requires `price_amount`, `price_currency` and `pay_currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn create(&self, data: Value) -> Result<Payment, ClientError> {
        self.client
            .post_required_typed(&["payment"], data, CREATE_REQUIRED)
            .await
    }

    /// `GET /payment/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_status(&self, payment_id: u64) -> Result<Payment, ClientError> {
        let id = payment_id.to_string();
        self.client.get_typed(&["payment", id.as_str()], &[]).await
    }

    /// `GET /payment` with arbitrary filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.client.get_path(&["payment"], filters).await
    }

    /// `POST /payment/{id}/update-merchant-estimate`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn update_estimate(&self, payment_id: u64) -> Result<Value, ClientError> {
        let id = payment_id.to_string();
        self.client
            .post_path(&["payment", id.as_str(), "update-merchant-estimate"], None)
            .await
    }

    /// `POST /invoice`. Requires `price_amount`, `price_currency` and `order_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn create_invoice(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["invoice"], data, INVOICE_REQUIRED, None)
            .await
    }

    /// `GET /invoice/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_invoice_status(&self, invoice_id: &str) -> Result<Value, ClientError> {
        self.client.get_path(&["invoice", invoice_id], &[]).await
    }

    /// `POST /invoice-payment`. Requires `iid` and `pay_currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if a required field is blank, or any
    /// transport or API error.
    pub async fn create_invoice_payment(&self, data: Value) -> Result<Value, ClientError> {
        self.client
            .post_required(&["invoice-payment"], data, INVOICE_PAYMENT_REQUIRED, None)
            .await
    }

    /// Creates a payment from its price and currencies.
    ///
    /// `options` is a JSON object (or `null`) merged over the base fields,
    /// e.g. `order_id` or `ipn_callback_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `options` is not an object or the request fails.
    pub async fn create_payment(
        &self,
        price_amount: Decimal,
        price_currency: &str,
        pay_currency: &str,
        options: Value,
    ) -> Result<Payment, ClientError> {
        let mut base = Map::new();
        base.insert("price_amount".into(), amount(price_amount));
        base.insert("price_currency".into(), price_currency.into());
        base.insert("pay_currency".into(), pay_currency.into());
        self.create(merge_options(base, options)?).await
    }

    /// Alias for [`Self::get_status`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_payment(&self, payment_id: u64) -> Result<Payment, ClientError> {
        self.get_status(payment_id).await
    }

    /// Lists payments in the given state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_status(
        &self,
        status: &PaymentStatus,
        limit: u32,
        page: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("payment_status", status.as_str().to_owned()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Lists payments paid in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_by_currency(
        &self,
        currency: &str,
        limit: u32,
        page: u32,
    ) -> Result<Value, ClientError> {
        let query = [
            ("pay_currency", currency.to_owned()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }

    /// Lists payments created between two dates (`YYYY-MM-DD` or ISO 8601).
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
            ("dateFrom", date_from.to_owned()),
            ("dateTo", date_to.to_owned()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        self.list(&borrow_pairs(&query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LIMIT;
    use crate::services::test_support::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payment_response() -> Value {
        json!({
            "payment_id": "5745459419",
            "payment_status": "waiting",
            "pay_address": "3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj",
            "price_amount": 100,
            "price_currency": "usd",
            "pay_amount": 0.0017,
            "pay_currency": "btc",
            "order_id": "A-1"
        })
    }

    #[tokio::test]
    async fn test_create_payment_merges_options() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .and(body_json(json!({
                "price_amount": 100,
                "price_currency": "usd",
                "pay_currency": "btc",
                "order_id": "A-1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(payment_response()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let payment = client
            .payments()
            .create_payment(Decimal::new(100, 0), "usd", "btc", json!({"order_id": "A-1"}))
            .await
            .unwrap();
        assert_eq!(payment.payment_id, 5_745_459_419);
        assert_eq!(payment.payment_status, PaymentStatus::Waiting);
        assert_eq!(payment.order_id.as_deref(), Some("A-1"));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .payments()
            .create(json!({"price_amount": 10, "price_currency": ""}))
            .await
            .unwrap_err();
        let ClientError::Validation(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(err.missing_fields(), ["price_currency", "pay_currency"]);
    }

    #[tokio::test]
    async fn test_get_status_and_update_estimate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment/5745459419"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_response()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/payment/5745459419/update-merchant-estimate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "5745459419", "pay_amount": 0.0018})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let payments = client.payments();
        let payment = payments.get_payment(5_745_459_419).await.unwrap();
        assert_eq!(payment.pay_currency.as_deref(), Some("btc"));

        let estimate = payments.update_estimate(5_745_459_419).await.unwrap();
        assert_eq!(estimate["pay_amount"], json!(0.0018));
    }

    #[tokio::test]
    async fn test_invoice_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/invoice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "4522625843"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/invoice/4522625843"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "4522625843"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/invoice-payment"))
            .and(body_json(json!({"iid": 4_522_625_843_u64, "pay_currency": "btc"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"payment_id": "1"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let payments = client.payments();
        let invoice = payments
            .create_invoice(json!({"price_amount": 10, "price_currency": "usd", "order_id": "A-2"}))
            .await
            .unwrap();
        assert_eq!(invoice["id"], json!("4522625843"));

        let status = payments.get_invoice_status("4522625843").await.unwrap();
        assert_eq!(status["id"], json!("4522625843"));

        let paid = payments
            .create_invoice_payment(json!({"iid": 4_522_625_843_u64, "pay_currency": "btc"}))
            .await
            .unwrap();
        assert_eq!(paid["payment_id"], json!("1"));

        let err = payments
            .create_invoice(json!({"price_amount": 10, "price_currency": "usd"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment"))
            .and(query_param("payment_status", "finished"))
            .and(query_param("limit", "10"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/payment"))
            .and(query_param("dateFrom", "2024-01-01"))
            .and(query_param("dateTo", "2024-01-31"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [1], "total": 1})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/payment"))
            .and(query_param("pay_currency", "eth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [2], "total": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let payments = client.payments();
        let finished = payments
            .list_by_status(&PaymentStatus::Finished, DEFAULT_LIMIT, 0)
            .await
            .unwrap();
        assert_eq!(finished["total"], json!(0));

        let ranged = payments
            .list_by_date_range("2024-01-01", "2024-01-31", DEFAULT_LIMIT, 2)
            .await
            .unwrap();
        assert_eq!(ranged["data"], json!([1]));

        let by_currency = payments.list_by_currency("eth", 5, 0).await.unwrap();
        assert_eq!(by_currency["data"], json!([2]));
    }
}
