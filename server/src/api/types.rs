//! Shared API types
//!
//! Common error handling and parameter parsing used across all endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;

/// Parse an optional calendar date parameter (YYYY-MM-DD)
pub fn parse_date_param(s: &Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    match s {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError::bad_request(
                    "INVALID_DATE",
                    format!("Invalid date: {}. Use YYYY-MM-DD format.", d),
                )
            }),
        None => Ok(None),
    }
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    Conflict { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_postgres(e: crate::data::postgres::PostgresError) -> Self {
        tracing::error!(error = %e, "PostgreSQL error");
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::Forbidden { code, message } => {
                (StatusCode::FORBIDDEN, "forbidden", code, message)
            }
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_param() {
        assert_eq!(parse_date_param(&None).unwrap(), None);
        assert_eq!(
            parse_date_param(&Some("2024-02-29".to_string())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_date_param(&Some("02/29/2024".to_string())).is_err());
        assert!(parse_date_param(&Some("2024-13-01".to_string())).is_err());
        assert!(parse_date_param(&Some("not-a-date".to_string())).is_err());
    }
}
