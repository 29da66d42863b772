#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async REST client for the NOWPayments crypto payment gateway.
//!
//! Wraps the gateway's v1 API behind [`NowPaymentsClient`] and one service
//! handle per resource. Request bodies are plain JSON; required fields are
//! checked locally before anything goes over the wire.
//!
//! # Modules
//!
//! - [`client`] - The REST client and its request helpers
//! - [`constants`] - Header names, user agent, and paging defaults
//! - [`error`] - Transport and API error types
//! - [`services`] - Payments, subscriptions, payouts, custody, conversions, general, IPN
//! - `server` - Signature extraction for inbound IPN requests (feature: `server`)
//!
//! # Feature Flags
//!
//! - `server` - Helpers over `http::HeaderMap` for webhook endpoints
//! - `telemetry` - `tracing` spans around every request

pub mod client;
pub mod constants;
pub mod error;
pub mod services;

#[cfg(feature = "server")]
pub mod server;

pub use client::NowPaymentsClient;
pub use error::{ApiError, ClientError};
pub use nowpayments;
