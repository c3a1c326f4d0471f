//! API DTOs (Data Transfer Objects)

use serde::Serialize;

/// Response for GET /api/csrf/token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_at_ms: i64,
}
