#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the NOWPayments crypto payment gateway.
//!
//! This crate holds everything that does not touch the network: client
//! configuration, the error taxonomy, request validation, the gateway's
//! status vocabularies, and verification of Instant Payment Notifications
//! (IPN). The REST client lives in `nowpayments-http`.
//!
//! # Modules
//!
//! - [`config`] - API key, environment selection, and the IPN secret
//! - [`error`] - Configuration and validation errors
//! - [`ipn`] - Canonicalization, HMAC-SHA512 signing, and webhook verification
//! - [`models`] - Typed views of selected gateway responses
//! - [`status`] - Payment, payout, and conversion status enums
//! - [`validation`] - Required-field checks for request bodies
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` events from the IPN verifier

pub mod config;
pub mod error;
pub mod ipn;
pub mod models;
pub mod status;
pub mod validation;

pub use config::{ClientConfig, Environment, IpnSecret};
pub use error::{ConfigurationError, ValidationError};
pub use ipn::{IpnPayload, PaymentNotification, process_notification, verify_signature};
pub use status::{ConversionStatus, PaymentStatus, PayoutStatus};
