//! Lifecycle status vocabularies reported by the gateway.
//!
//! Every enum here is closed over the values the gateway documents and has an
//! explicit `Unrecognized` arm holding the raw text of anything else, so a new
//! or malformed status never fails deserialization.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value outside the documented set (empty when the field was absent).
            Unrecognized(String),
        }

        impl $name {
            /// Returns the wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            /// Classifies an arbitrary JSON value; non-strings are unrecognized.
            #[must_use]
            pub fn from_json(value: &Value) -> Self {
                match value {
                    Value::String(raw) => Self::from(raw.as_str()),
                    Value::Null => Self::Unrecognized(String::new()),
                    other => Self::Unrecognized(other.to_string()),
                }
            }

            /// Returns `true` for the `Unrecognized` arm.
            #[must_use]
            pub const fn is_unrecognized(&self) -> bool {
                matches!(self, Self::Unrecognized(_))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => Self::$variant, )+
                    other => Self::Unrecognized(other.to_owned()),
                }
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(Self::from_json(&Value::deserialize(deserializer)?))
            }
        }
    };
}

status_enum! {
    /// State of a payment as carried in `payment_status`.
    PaymentStatus {
        /// Waiting for the customer to send funds.
        Waiting => "waiting",
        /// Transaction seen, awaiting confirmations.
        Confirming => "confirming",
        /// Confirmed on chain.
        Confirmed => "confirmed",
        /// Funds are being forwarded to the merchant wallet.
        Sending => "sending",
        /// Customer sent less than the requested amount.
        PartiallyPaid => "partially_paid",
        /// Funds reached the merchant; terminal success.
        Finished => "finished",
        /// Terminal failure.
        Failed => "failed",
        /// Funds were returned to the customer.
        Refunded => "refunded",
        /// No funds arrived within the payment window.
        Expired => "expired",
    }
}

status_enum! {
    /// State of a payout batch or withdrawal.
    PayoutStatus {
        /// Created, awaiting 2FA verification.
        Creating => "creating",
        /// Queued for processing.
        Waiting => "waiting",
        /// In progress.
        Processing => "processing",
        /// Broadcasting to the network.
        Sending => "sending",
        /// Completed.
        Finished => "finished",
        /// Failed.
        Failed => "failed",
        /// Rejected by the gateway.
        Rejected => "rejected",
    }
}

status_enum! {
    /// State of a currency conversion.
    ConversionStatus {
        /// Not yet executed.
        Pending => "pending",
        /// Being executed.
        Processing => "processing",
        /// Completed successfully.
        Completed => "completed",
        /// Failed.
        Failed => "failed",
        /// Rejected by the gateway.
        Rejected => "rejected",
    }
}

impl PaymentStatus {
    /// Returns `true` for states after which the gateway sends no further
    /// updates for the payment.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Failed | Self::Refunded | Self::Expired
        )
    }

    /// Awaiting the customer's transfer.
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Transfer seen on chain, awaiting confirmations.
    #[must_use]
    pub const fn is_confirming(&self) -> bool {
        matches!(self, Self::Confirming)
    }

    /// Confirmed on chain.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// The customer sent less than requested.
    #[must_use]
    pub const fn is_partially_paid(&self) -> bool {
        matches!(self, Self::PartiallyPaid)
    }

    /// Funds reached the merchant.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// The payment failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// No funds arrived before the deadline.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_parsing() {
        assert_eq!(PaymentStatus::from("finished"), PaymentStatus::Finished);
        assert_eq!(
            PaymentStatus::from("partially_paid"),
            PaymentStatus::PartiallyPaid
        );
        assert_eq!(
            PaymentStatus::from("bogus"),
            PaymentStatus::Unrecognized("bogus".into())
        );
        assert_eq!(
            "Finished".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::Unrecognized("Finished".into())
        );
    }

    #[test]
    fn test_status_serde() {
        let status: PaymentStatus = serde_json::from_str("\"confirming\"").unwrap();
        assert_eq!(status, PaymentStatus::Confirming);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"confirming\"");

        let unknown: PayoutStatus = serde_json::from_str("\"teleported\"").unwrap();
        assert_eq!(unknown.as_str(), "teleported");
        assert!(unknown.is_unrecognized());

        let absent: ConversionStatus = serde_json::from_str("null").unwrap();
        assert_eq!(absent, ConversionStatus::Unrecognized(String::new()));

        let numeric: PaymentStatus = serde_json::from_str("5").unwrap();
        assert_eq!(numeric, PaymentStatus::Unrecognized("5".into()));
    }

    #[test]
    fn test_terminal_states() {
        assert!(PaymentStatus::Finished.is_terminal());
        assert!(PaymentStatus::Expired.is_terminal());
        assert!(!PaymentStatus::Confirming.is_terminal());
        assert!(!PaymentStatus::Unrecognized(String::new()).is_terminal());
    }

    #[test]
    fn test_predicates_on_decoded_status() {
        let data = serde_json::json!({"payment_status": "partially_paid", "payment_id": 7});
        let status = PaymentStatus::from_json(&data["payment_status"]);
        assert!(status.is_partially_paid());
        assert!(!status.is_finished());

        assert!(PaymentStatus::from("finished").is_finished());
        assert!(PaymentStatus::from("expired").is_expired());
        let unknown = PaymentStatus::from("bogus");
        assert!(!unknown.is_waiting() && !unknown.is_failed() && !unknown.is_confirmed());
    }
}
