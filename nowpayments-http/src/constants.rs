//! HTTP-specific constants for the NOWPayments API.

/// Header carrying the merchant API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the IPN signature on inbound callbacks.
pub const SIGNATURE_HEADER: &str = nowpayments::ipn::SIGNATURE_HEADER;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("nowpayments-rs/", env!("CARGO_PKG_VERSION"));

/// Default page size for the `list_by_*` helpers.
pub const DEFAULT_LIMIT: u32 = 10;

/// Account id the custody API uses for the merchant's master account.
pub const MASTER_ACCOUNT_ID: u64 = 0;
