//! Domain Entities
//!
//! The anti-forgery token and its wire form.

use std::fmt;

/// Separator between the three token fields
///
/// Fields are hex or decimal, so it never occurs inside one.
pub const DELIMITER: char = '|';

/// Hex length of an HMAC-SHA256 signature
pub const SIGNATURE_HEX_LEN: usize = 64;

/// A signed, time-limited anti-forgery token
///
/// Wire form: `random_value|expires_at_ms|signature`. Tokens are never
/// stored; the signature is what makes them trustworthy.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken {
    /// Hex-encoded random value
    pub random_value: String,
    /// Absolute expiry, Unix epoch milliseconds
    pub expires_at_ms: i64,
    /// Hex-encoded HMAC-SHA256 over the signing payload
    pub signature: String,
}

impl CsrfToken {
    /// Parse the wire form
    ///
    /// Accepts only what [`Display`](fmt::Display) produces: lowercase hex
    /// random value, canonical decimal expiry, 64 lowercase hex signature.
    /// Other spellings of the same values (uppercase hex, zero-padded
    /// expiry) are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(DELIMITER);
        let random_value = parts.next()?;
        let expires_at = parts.next()?;
        let signature = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        if random_value.is_empty() || !is_lower_hex(random_value) {
            return None;
        }
        if signature.len() != SIGNATURE_HEX_LEN || !is_lower_hex(signature) {
            return None;
        }

        // Rejects '+', leading zeros and "-0"
        let expires_at_ms: i64 = expires_at.parse().ok()?;
        if expires_at_ms.to_string() != expires_at {
            return None;
        }

        Some(Self {
            random_value: random_value.to_string(),
            expires_at_ms,
            signature: signature.to_string(),
        })
    }

    /// Check if the token has expired at `now_ms`
    ///
    /// The expiry instant itself is still valid.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.random_value, self.expires_at_ms, self.signature
        )
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfToken")
            .field("expires_at_ms", &self.expires_at_ms)
            .finish_non_exhaustive()
    }
}
