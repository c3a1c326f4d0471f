//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (CsrfToken and its wire form)
//! - Domain services (HMAC signing and verification)
//! - The clock port used for expiry

pub mod clock;
pub mod entities;
pub mod services;
