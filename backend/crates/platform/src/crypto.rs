//! Cryptographic Utilities

use std::fmt;

use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Failure of the operating system entropy source
#[derive(Debug, Error)]
#[error("Secure random source unavailable: {0}")]
pub struct RandomError(#[from] rand::Error);

/// Generate cryptographically secure random bytes
///
/// Panics if the OS entropy source fails. Call [`try_random_bytes`] once at
/// startup to turn that into a startup error instead.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Fallible variant of [`random_bytes`]
pub fn try_random_bytes(len: usize) -> Result<Vec<u8>, RandomError> {
    let mut bytes = vec![0u8; len];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes)
}

/// Random bytes, lowercase hex encoded (`2 * len` characters)
pub fn random_hex(len: usize) -> String {
    to_hex(&random_bytes(len))
}

/// Encode bytes as lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex to bytes
pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}

/// Compute HMAC-SHA256 over `data`, keyed by `key` (any length)
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Check an HMAC-SHA256 tag in constant time
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.verify_slice(tag).is_ok()
}

/// Server-held signing key
///
/// Zeroized on drop, redacted in `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Fresh key from the OS entropy source
    pub fn random(len: usize) -> Result<Self, RandomError> {
        try_random_bytes(len).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretKey").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));

        assert_eq!(try_random_bytes(16).unwrap().len(), 16);
    }

    #[test]
    fn test_random_hex() {
        let a = random_hex(16);
        let b = random_hex(16);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_roundtrip() {
        let data = b"hello world";
        assert_eq!(from_hex(&to_hex(data)).unwrap(), data);
        assert!(from_hex("zz").is_err());
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            to_hex(&mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_hmac() {
        let key = b"key";
        let tag = hmac_sha256(key, b"message");
        assert!(verify_hmac_sha256(key, b"message", &tag));
        assert!(!verify_hmac_sha256(key, b"messagf", &tag));
        assert!(!verify_hmac_sha256(b"other", b"message", &tag));
        assert!(!verify_hmac_sha256(key, b"message", &tag[..31]));
    }

    #[test]
    fn test_secret_key_debug_redacted() {
        let key = SecretKey::new("super-secret");
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(key.len(), 12);
    }

    #[test]
    fn test_random_secret_key() {
        let a = SecretKey::random(32).unwrap();
        let b = SecretKey::random(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
