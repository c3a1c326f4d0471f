//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (OS randomness, hex, HMAC-SHA256, secret keys)
//! - Cookie building and parsing

pub mod cookie;
pub mod crypto;
