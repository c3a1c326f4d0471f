//! Application Configuration
//!
//! Configuration for the CSRF token service. The secret is always injected;
//! there is no built-in fallback secret.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::SecretKey;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::error::{CsrfError, CsrfResult};

/// Token lifetime used by every issuance path (endpoint, middleware, cookie)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(2 * 3600);

/// Random bytes per token
pub const DEFAULT_TOKEN_BYTES: usize = 32;
pub const MIN_TOKEN_BYTES: usize = 16;

/// Minimum secret length accepted in production
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

pub const DEFAULT_HEADER_NAME: &str = "x-csrf-token";
pub const DEFAULT_FIELD_NAME: &str = "_csrf";
pub const DEFAULT_COOKIE_NAME: &str = "csrf_token";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Debug builds default to development, release builds to production
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn parse(s: &str) -> CsrfResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(CsrfError::InvalidConfig(format!(
                "APP_ENV must be 'production' or 'development' (got '{other}')"
            ))),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// CSRF token service configuration
#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// HMAC signing secret
    pub secret: SecretKey,
    /// Token lifetime
    pub token_ttl: Duration,
    /// Random bytes per token (at least 16)
    pub token_bytes: usize,
    /// Request header carrying the token (matched case-insensitively)
    pub header_name: String,
    /// Body field / query parameter carrying the token
    pub field_name: String,
    /// Cookie the issued token is delivered in
    pub cookie_name: String,
    /// Whether issuance also sets the cookie
    pub set_cookie: bool,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Session cookie whose value is folded into the signature, if any
    pub session_cookie_name: Option<String>,
    /// Upper bound on body bytes buffered while looking for the token field
    pub max_body_bytes: usize,
}

impl CsrfConfig {
    /// Production defaults around an explicit secret
    pub fn new(secret: SecretKey) -> Self {
        Self {
            secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            token_bytes: DEFAULT_TOKEN_BYTES,
            header_name: DEFAULT_HEADER_NAME.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            set_cookie: true,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            session_cookie_name: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Create config for development (random secret, insecure cookie)
    pub fn development() -> CsrfResult<Self> {
        Ok(Self {
            cookie_secure: false,
            ..Self::new(SecretKey::random(MIN_PRODUCTION_SECRET_BYTES)?)
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_session_binding(mut self, cookie_name: impl Into<String>) -> Self {
        self.session_cookie_name = Some(cookie_name.into());
        self
    }

    /// Load from process environment
    pub fn from_env() -> CsrfResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    ///
    /// Reads `APP_ENV`, `CSRF_SECRET`, `CSRF_TOKEN_TTL_SECS`,
    /// `CSRF_SESSION_COOKIE` and `CSRF_SET_COOKIE`.
    pub fn from_lookup<F>(lookup: F) -> CsrfResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match var("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::from_build(),
        };

        let secret = match var("CSRF_SECRET") {
            Some(secret) => {
                if environment.is_production() && secret.len() < MIN_PRODUCTION_SECRET_BYTES {
                    return Err(CsrfError::WeakSecret {
                        min: MIN_PRODUCTION_SECRET_BYTES,
                        actual: secret.len(),
                    });
                }
                SecretKey::new(secret)
            }
            None if environment.is_production() => return Err(CsrfError::MissingSecret),
            None => {
                tracing::warn!(
                    "CSRF_SECRET not set, using a random secret; tokens will not survive restarts"
                );
                SecretKey::random(MIN_PRODUCTION_SECRET_BYTES)?
            }
        };

        let mut config = Self::new(secret);
        config.cookie_secure = environment.is_production();

        if let Some(ttl) = var("CSRF_TOKEN_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().map_err(|_| {
                CsrfError::InvalidConfig(format!("CSRF_TOKEN_TTL_SECS is not a number: '{ttl}'"))
            })?;
            config.token_ttl = Duration::from_secs(secs);
        }

        config.session_cookie_name = var("CSRF_SESSION_COOKIE").map(|v| v.trim().to_string());

        if let Some(flag) = var("CSRF_SET_COOKIE") {
            config.set_cookie = match flag.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(CsrfError::InvalidConfig(format!(
                        "CSRF_SET_COOKIE must be true or false (got '{other}')"
                    )));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> CsrfResult<()> {
        if self.secret.is_empty() {
            return Err(CsrfError::MissingSecret);
        }
        if self.token_bytes < MIN_TOKEN_BYTES {
            return Err(CsrfError::InvalidConfig(format!(
                "token_bytes must be at least {MIN_TOKEN_BYTES}"
            )));
        }
        if self.token_ttl.is_zero() || i64::try_from(self.token_ttl.as_millis()).is_err() {
            return Err(CsrfError::InvalidConfig(
                "token TTL must be positive and fit in i64 milliseconds".to_string(),
            ));
        }
        if http::HeaderName::from_bytes(self.header_name.as_bytes()).is_err() {
            return Err(CsrfError::InvalidConfig(format!(
                "'{}' is not a valid header name",
                self.header_name
            )));
        }
        Ok(())
    }

    pub fn token_ttl_ms(&self) -> i64 {
        self.token_ttl.as_millis() as i64
    }

    /// Attributes of the cookie the token is delivered in
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            same_site: self.cookie_same_site,
            ..CookieConfig::http_only(&self.cookie_name, self.token_ttl, self.cookie_secure)
        }
    }
}
