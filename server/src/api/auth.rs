//! Caller identity from a trusted upstream header
//!
//! Authentication happens upstream (reverse proxy or gateway); this server
//! trusts the forwarded user ID header. The extractor only checks that the
//! header is present and shaped like an ID; it does not prove anything about
//! the caller, so the server must never be exposed without that upstream.

use axum::http::request::Parts;
use axum::{extract::FromRequestParts, http::HeaderMap};

use super::extractors::is_valid_id;
use super::types::ApiError;

/// Header carrying the authenticated user's ID, set by the upstream proxy
pub const USER_ID_HEADER: &str = "x-hard75-user-id";

/// Authenticated caller identity
#[derive(Debug, Clone)]
pub struct Auth {
    pub user_id: String,
}

fn user_id_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers.get(USER_ID_HEADER).ok_or_else(|| {
        ApiError::unauthorized(
            "MISSING_USER_ID",
            format!("Missing {} header", USER_ID_HEADER),
        )
    })?;

    let user_id = value.to_str().map_err(|_| {
        ApiError::unauthorized("INVALID_USER_ID", "User ID header is not valid ASCII")
    })?;

    if !is_valid_id(user_id) {
        return Err(ApiError::unauthorized(
            "INVALID_USER_ID",
            "User ID must be 1-64 alphanumeric chars, dashes, or underscores",
        ));
    }

    Ok(user_id.to_string())
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = user_id_from_headers(&parts.headers)?;
        Ok(Self { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extracts_valid_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("usr_abc123"));
        assert_eq!(user_id_from_headers(&headers).unwrap(), "usr_abc123");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(matches!(
            user_id_from_headers(&headers),
            Err(ApiError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_malformed_id_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("bad id; drop"));
        assert!(matches!(
            user_id_from_headers(&headers),
            Err(ApiError::Unauthorized { .. })
        ));
    }
}
