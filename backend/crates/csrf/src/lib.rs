//! CSRF (Cross-Site Request Forgery) Protection Module
//!
//! Clean Architecture structure:
//! - `domain/` - Token entity, signing services, clock port
//! - `application/` - Token service and configuration
//! - `presentation/` - HTTP handlers, middleware, router
//!
//! ## Security Model
//! - Tokens are `random|expiry|signature`, signed with HMAC-SHA256 under a
//!   server-held secret; nothing is stored server-side
//! - Signatures are compared in constant time
//! - Safe methods (GET, HEAD, OPTIONS) bypass the check
//! - Every failure (missing, malformed, expired, forged) is one generic 403
//! - Optionally bound to a session cookie value

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{CsrfConfig, DEFAULT_TOKEN_TTL};
pub use application::token_service::{CsrfTokenService, IssuedToken};
pub use domain::clock::{Clock, ManualClock, SystemClock};
pub use error::{CsrfError, CsrfResult};
pub use presentation::handlers::CsrfAppState;
pub use presentation::middleware::{IssuedCsrfToken, issue_csrf_token, require_csrf_token};
pub use presentation::router::{csrf_router, protect, protect_and_issue};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
