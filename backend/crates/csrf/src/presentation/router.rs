//! CSRF Router

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower::ServiceBuilder;

use crate::presentation::handlers::{self, CsrfAppState};
use crate::presentation::middleware::{issue_csrf_token, require_csrf_token};

/// Create the CSRF router (token issuance endpoint)
pub fn csrf_router(state: CsrfAppState) -> Router {
    Router::new()
        .route("/token", get(handlers::issue_token))
        .with_state(state)
}

/// Require a valid token on every unsafe request reaching `router`
pub fn protect(router: Router, state: CsrfAppState) -> Router {
    router.layer(from_fn_with_state(state, require_csrf_token))
}

/// [`protect`], plus a fresh token on every safe-method response
pub fn protect_and_issue(router: Router, state: CsrfAppState) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(from_fn_with_state(state.clone(), issue_csrf_token))
            .layer(from_fn_with_state(state, require_csrf_token)),
    )
}
