//! Shared Kernel - Domain-crossing minimal core
//!
//! Holds the error vocabulary every crate in the workspace agrees on:
//! - [`error::kind::ErrorKind`], the HTTP-facing error classification
//! - [`error::app_error::AppError`], the unified error value and its result alias
//! - conversions from common library errors, and RFC 7807 rendering for axum

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
