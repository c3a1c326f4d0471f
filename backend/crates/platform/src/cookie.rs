//! Cookie Management Infrastructure
//!
//! Set-Cookie building and Cookie header parsing.

use std::fmt::Write as _;
use std::time::Duration;

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes of a cookie the server sets
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Option<Duration>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age: None,
        }
    }
}

impl CookieConfig {
    /// HTTP-only cookie living as long as `max_age`
    pub fn http_only(name: impl Into<String>, max_age: Duration, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age: Some(max_age),
            ..Self::default()
        }
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        // Writing to a String cannot fail
        let _ = write!(cookie, "; SameSite={}", self.same_site.as_str());
        let _ = write!(cookie, "; Path={}", self.path);

        if let Some(max_age) = self.max_age {
            let _ = write!(cookie, "; Max-Age={}", max_age.as_secs());
        }

        cookie
    }

    /// Set-Cookie as a header value; fails if `value` holds bytes a header cannot carry
    pub fn set_cookie_header(&self, value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(value))
    }
}

/// Extract a cookie value from headers
///
/// Looks through every `Cookie` header, since HTTP/2 clients may split them.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}
