//! Application Layer
//!
//! Token service and its configuration.

pub mod config;
pub mod token_service;

// Re-exports
pub use config::CsrfConfig;
pub use token_service::{CsrfTokenService, IssuedToken};
