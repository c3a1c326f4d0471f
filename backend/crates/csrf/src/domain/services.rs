//! Domain Services
//!
//! Pure token signing and signature checking.

use platform::crypto::{SecretKey, from_hex, hmac_sha256, to_hex, verify_hmac_sha256};

use crate::domain::entities::DELIMITER;

/// Bytes covered by the signature
///
/// `random|expiry`, or `random|expiry|binding` for session-bound tokens.
/// The first two fields cannot contain the delimiter, so the two shapes
/// never collide.
pub fn signing_payload(random_value: &str, expires_at_ms: i64, binding: Option<&str>) -> String {
    match binding {
        Some(binding) => format!("{random_value}{DELIMITER}{expires_at_ms}{DELIMITER}{binding}"),
        None => format!("{random_value}{DELIMITER}{expires_at_ms}"),
    }
}

/// Hex HMAC-SHA256 of the signing payload
pub fn sign(
    secret: &SecretKey,
    random_value: &str,
    expires_at_ms: i64,
    binding: Option<&str>,
) -> String {
    let payload = signing_payload(random_value, expires_at_ms, binding);
    to_hex(&hmac_sha256(secret.as_bytes(), payload.as_bytes()))
}

/// Check a hex signature in constant time
pub fn verify_signature(
    secret: &SecretKey,
    random_value: &str,
    expires_at_ms: i64,
    binding: Option<&str>,
    signature_hex: &str,
) -> bool {
    let Ok(signature) = from_hex(signature_hex) else {
        return false;
    };
    let payload = signing_payload(random_value, expires_at_ms, binding);
    verify_hmac_sha256(secret.as_bytes(), payload.as_bytes(), &signature)
}
