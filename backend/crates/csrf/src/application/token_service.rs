//! CSRF Token Service
//!
//! Issues and verifies stateless anti-forgery tokens. Holds only immutable
//! data, so one instance is shared across all requests behind an `Arc`.

use std::sync::Arc;

use platform::crypto::{SecretKey, random_hex, try_random_bytes};

use crate::application::config::CsrfConfig;
use crate::domain::clock::Clock;
use crate::domain::entities::CsrfToken;
use crate::domain::services::{sign, verify_signature};
use crate::error::CsrfResult;

/// Output of an issuance
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at_ms: i64,
}

/// Token generation and verification
pub struct CsrfTokenService {
    secret: SecretKey,
    ttl_ms: i64,
    token_bytes: usize,
    clock: Arc<dyn Clock>,
}

impl CsrfTokenService {
    /// Build the service, probing the OS entropy source once
    ///
    /// Fails on invalid configuration or unavailable randomness, so those
    /// surface at startup rather than per request.
    pub fn new(config: &CsrfConfig, clock: impl Clock) -> CsrfResult<Self> {
        config.validate()?;
        try_random_bytes(config.token_bytes)?;

        Ok(Self {
            secret: config.secret.clone(),
            ttl_ms: config.token_ttl_ms(),
            token_bytes: config.token_bytes,
            clock: Arc::new(clock),
        })
    }

    /// Generate an unbound token
    pub fn generate(&self) -> String {
        self.issue(None).token
    }

    /// Generate a token bound to `binding` (typically a session id)
    pub fn generate_bound(&self, binding: &str) -> String {
        self.issue(Some(binding)).token
    }

    /// Generate a token and report its expiry
    pub fn issue(&self, binding: Option<&str>) -> IssuedToken {
        let random_value = random_hex(self.token_bytes);
        let expires_at_ms = self.clock.now_ms().saturating_add(self.ttl_ms);
        let signature = sign(&self.secret, &random_value, expires_at_ms, binding);

        let token = CsrfToken {
            random_value,
            expires_at_ms,
            signature,
        };

        IssuedToken {
            token: token.to_string(),
            expires_at_ms,
        }
    }

    /// Verify an unbound token
    pub fn verify(&self, token: &str) -> bool {
        self.verify_bound(token, None)
    }

    /// Verify a token against an optional binding
    ///
    /// True only for a well-formed, unexpired token whose signature matches.
    /// Every failure is the same `false`.
    pub fn verify_bound(&self, token: &str, binding: Option<&str>) -> bool {
        let Some(token) = CsrfToken::parse(token) else {
            return false;
        };

        if token.is_expired_at(self.clock.now_ms()) {
            return false;
        }

        verify_signature(
            &self.secret,
            &token.random_value,
            token.expires_at_ms,
            binding,
            &token.signature,
        )
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }
}

impl std::fmt::Debug for CsrfTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfTokenService")
            .field("ttl_ms", &self.ttl_ms)
            .field("token_bytes", &self.token_bytes)
            .finish_non_exhaustive()
    }
}
