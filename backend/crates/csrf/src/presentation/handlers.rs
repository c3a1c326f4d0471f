//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};

use crate::application::config::CsrfConfig;
use crate::application::token_service::{CsrfTokenService, IssuedToken};
use crate::domain::clock::Clock;
use crate::error::CsrfResult;
use crate::presentation::dto::TokenResponse;
use crate::presentation::middleware::IssuedCsrfToken;

/// Shared state for CSRF handlers and middleware
#[derive(Clone, Debug)]
pub struct CsrfAppState {
    pub service: Arc<CsrfTokenService>,
    pub config: Arc<CsrfConfig>,
}

impl CsrfAppState {
    pub fn new(config: CsrfConfig, clock: impl Clock) -> CsrfResult<Self> {
        let service = CsrfTokenService::new(&config, clock)?;
        Ok(Self {
            service: Arc::new(service),
            config: Arc::new(config),
        })
    }

    /// Session binding for this request, when binding is enabled
    pub fn binding(&self, headers: &HeaderMap) -> Option<String> {
        let name = self.config.session_cookie_name.as_deref()?;
        platform::cookie::extract_cookie(headers, name)
    }

    /// Issue a token for the client sending `headers`
    pub fn issue(&self, headers: &HeaderMap) -> IssuedToken {
        let binding = self.binding(headers);
        self.service.issue(binding.as_deref())
    }

    /// Set-Cookie value delivering `token`, if cookie delivery is enabled
    pub fn token_cookie(&self, token: &str) -> Option<HeaderValue> {
        if !self.config.set_cookie {
            return None;
        }
        match self.config.cookie().set_cookie_header(token) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "CSRF cookie not representable as a header");
                None
            }
        }
    }
}

/// GET /api/csrf/token
///
/// Behind [`issue_csrf_token`](crate::presentation::middleware::issue_csrf_token)
/// the layer's token is returned, and the layer sets its header and cookie.
pub async fn issue_token(State(state): State<CsrfAppState>, req: Request) -> Response {
    let (issued, cookie) = match req.extensions().get::<IssuedCsrfToken>() {
        Some(IssuedCsrfToken(issued)) => (issued.clone(), None),
        None => {
            let issued = state.issue(req.headers());
            let cookie = state.token_cookie(&issued.token);
            (issued, cookie)
        }
    };

    tracing::debug!(expires_at_ms = issued.expires_at_ms, "Issued CSRF token");

    let mut response = Json(TokenResponse {
        token: issued.token,
        expires_at_ms: issued.expires_at_ms,
    })
    .into_response();

    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Some(cookie) = cookie {
        headers.append(header::SET_COOKIE, cookie);
    }

    response
}
