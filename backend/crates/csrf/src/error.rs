//! CSRF Error Types
//!
//! This module provides CSRF-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// CSRF-specific result type alias
pub type CsrfResult<T> = Result<T, CsrfError>;

/// The only message a client ever sees for a failed check
pub const REJECTION_MESSAGE: &str = "Invalid or missing CSRF token";

/// CSRF-specific error variants
///
/// `Rejected` is the single request-time failure: missing, malformed,
/// expired and forged tokens all collapse into it. The other variants are
/// startup failures.
#[derive(Debug, Error)]
pub enum CsrfError {
    /// Token missing or failed verification
    #[error("CSRF token missing or invalid")]
    Rejected,

    /// No signing secret configured where one is required
    #[error("CSRF_SECRET must be set in production")]
    MissingSecret,

    /// Signing secret shorter than the required minimum
    #[error("CSRF secret must be at least {min} bytes (got {actual})")]
    WeakSecret { min: usize, actual: usize },

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// OS entropy source unavailable
    #[error(transparent)]
    Entropy(#[from] platform::crypto::RandomError),
}

impl CsrfError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CsrfError::Rejected => StatusCode::FORBIDDEN,
            CsrfError::MissingSecret
            | CsrfError::WeakSecret { .. }
            | CsrfError::InvalidConfig(_)
            | CsrfError::Entropy(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsrfError::Rejected => ErrorKind::Forbidden,
            _ => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CsrfError::Rejected => {
                tracing::debug!("CSRF check rejected request");
            }
            _ => {
                tracing::error!(error = %self, "CSRF internal error");
            }
        }
    }
}

impl From<CsrfError> for AppError {
    fn from(err: CsrfError) -> Self {
        match err {
            CsrfError::Rejected => AppError::forbidden(REJECTION_MESSAGE),
            // Startup details stay in the logs
            other => AppError::internal("Internal server error").with_source(other),
        }
    }
}

impl IntoResponse for CsrfError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
