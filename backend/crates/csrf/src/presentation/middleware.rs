//! CSRF Middleware
//!
//! `require_csrf_token` rejects unsafe requests without a valid token.
//! `issue_csrf_token` hands a fresh token to safe requests.

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::config::CsrfConfig;
use crate::application::token_service::IssuedToken;
use crate::error::{CsrfError, CsrfResult};
use crate::presentation::handlers::CsrfAppState;

/// GET, HEAD and OPTIONS carry no side effects and skip validation
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Where the submitted token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Body,
    Query,
}

/// Token issued to the current request by [`issue_csrf_token`]
///
/// Handlers read it with `Extension<IssuedCsrfToken>` to embed it in pages.
/// The issuance endpoint hands out this same token instead of minting another.
#[derive(Debug, Clone)]
pub struct IssuedCsrfToken(pub IssuedToken);

/// Middleware that requires a valid CSRF token on unsafe methods
///
/// Lookup order is header, then body field, then query parameter. Any
/// failure is the same 403.
pub async fn require_csrf_token(
    State(state): State<CsrfAppState>,
    req: Request,
    next: Next,
) -> CsrfResult<Response> {
    if is_safe_method(req.method()) {
        return Ok(next.run(req).await);
    }

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let binding = state.binding(req.headers());

    let (req, found) = locate_token(req, &state.config).await?;

    let Some((source, token)) = found else {
        tracing::debug!(%method, %path, "CSRF token missing");
        return Err(CsrfError::Rejected);
    };

    if !state.service.verify_bound(&token, binding.as_deref()) {
        tracing::debug!(%method, %path, ?source, "CSRF token failed verification");
        return Err(CsrfError::Rejected);
    }

    Ok(next.run(req).await)
}

/// Middleware that issues a token to every safe-method request
///
/// The token goes into request extensions, the response header named by
/// `header_name`, and the cookie when cookie delivery is on.
pub async fn issue_csrf_token(
    State(state): State<CsrfAppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !is_safe_method(req.method()) {
        return next.run(req).await;
    }

    let issued = state.issue(req.headers());
    req.extensions_mut().insert(IssuedCsrfToken(issued.clone()));

    let mut response = next.run(req).await;

    let header_name = HeaderName::try_from(state.config.header_name.as_str());
    let header_value = HeaderValue::from_str(&issued.token);
    if let (Ok(name), Ok(value)) = (header_name, header_value) {
        response.headers_mut().insert(name, value);
    }
    if let Some(cookie) = state.token_cookie(&issued.token) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    response
}

/// Find the submitted token, handing back the request with its body intact
async fn locate_token(
    req: Request,
    config: &CsrfConfig,
) -> CsrfResult<(Request, Option<(TokenSource, String)>)> {
    if let Some(value) = req.headers().get(config.header_name.as_str()) {
        // A header that is not visible ASCII is a bad token, not a missing one
        let token = value.to_str().map(str::to_owned).unwrap_or_default();
        return Ok((req, Some((TokenSource::Header, token))));
    }

    let req = match body_format(req.headers()) {
        Some(format) => {
            let (parts, body) = req.into_parts();
            let bytes = axum::body::to_bytes(body, config.max_body_bytes)
                .await
                .map_err(|e| {
                    tracing::debug!(error = %e, "Could not buffer body for CSRF check");
                    CsrfError::Rejected
                })?;

            if let Some(token) = field_from_body(format, &bytes, &config.field_name) {
                let req = Request::from_parts(parts, Body::from(bytes));
                return Ok((req, Some((TokenSource::Body, token))));
            }
            Request::from_parts(parts, Body::from(bytes))
        }
        None => req,
    };

    let token = req
        .uri()
        .query()
        .and_then(|query| field_from_form(query.as_bytes(), &config.field_name));

    Ok((req, token.map(|t| (TokenSource::Query, t))))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
}

fn body_format(headers: &HeaderMap) -> Option<BodyFormat> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    {
        Some(BodyFormat::Json)
    } else if mime == "application/x-www-form-urlencoded" {
        Some(BodyFormat::Form)
    } else {
        None
    }
}

fn field_from_body(format: BodyFormat, bytes: &Bytes, field: &str) -> Option<String> {
    match format {
        BodyFormat::Json => {
            let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
            // Non-string values count as present but invalid
            value
                .get(field)
                .map(|v| v.as_str().map(str::to_owned).unwrap_or_default())
        }
        BodyFormat::Form => field_from_form(bytes, field),
    }
}

fn field_from_form(bytes: &[u8], field: &str) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes)
        .ok()?
        .into_iter()
        .find_map(|(key, value)| (key == field).then_some(value))
}
