//! Request-scoped helpers. There is no session state in this API - every
//! operation against a queue carries its access key on the request itself,
//! so there is no auth middleware to install; handlers pull the key
//! directly.

use axum::http::HeaderMap;

use crate::errors::{EngineError, Result};

pub const ACCESS_KEY_HEADER: &str = "x-access-key";

/// Pull the `X-Access-Key` header out of an incoming request.
pub fn extract_access_key(headers: &HeaderMap) -> Result<String> {
    headers
        .get(ACCESS_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EngineError::Unauthorized)
}
