//! HMAC-SHA512 signing and constant-time signature comparison.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Computes the lowercase hex HMAC-SHA512 of `message` keyed with `secret`.
///
/// # Panics
///
/// Never in practice: HMAC accepts keys of any length (RFC 2104).
#[must_use]
pub fn compute_signature(secret: &[u8], message: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret).expect("HMAC-SHA512 accepts keys of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two hex signatures in constant time.
///
/// Strings of different lengths are unequal; the comparison never errors.
#[must_use]
pub fn signatures_match(expected: &str, computed: &str) -> bool {
    expected.as_bytes().ct_eq(computed.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_length_and_case() {
        let sig = compute_signature(b"key", b"message");
        assert_eq!(sig.len(), 128);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2.
        let sig = compute_signature(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            sig,
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn test_secret_changes_signature() {
        assert_ne!(
            compute_signature(b"secret-a", b"payload"),
            compute_signature(b"secret-b", b"payload")
        );
    }

    #[test]
    fn test_signatures_match() {
        let sig = compute_signature(b"k", b"m");
        assert!(signatures_match(&sig, &sig));
        assert!(!signatures_match(&sig, &sig.to_uppercase()));
        assert!(!signatures_match(&sig, &sig[..127]));
        assert!(!signatures_match("", &sig));
        assert!(signatures_match("", ""));
    }
}
