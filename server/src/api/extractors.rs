//! Path and validation extractors for API routes

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Maximum length for path IDs (group_id, task_id, user IDs)
pub const MAX_ID_LENGTH: usize = 64;

/// Validate a generated ID: 1-64 chars, alphanumeric + dash/underscore
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LENGTH
        && id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Raw path extractor for group-scoped routes (internal use)
#[derive(Debug, Deserialize)]
struct GroupPathRaw {
    group_id: String,
}

/// Validated group path extractor.
///
/// Extracts and validates `group_id` from URL path parameters.
/// Returns a 400 Bad Request if validation fails.
#[derive(Debug)]
pub struct GroupPath {
    pub group_id: String,
}

impl<S> FromRequestParts<S> for GroupPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<GroupPathRaw>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        if !is_valid_id(&raw.group_id) {
            return Err(ValidationRejection::InvalidGroupId);
        }

        Ok(Self {
            group_id: raw.group_id,
        })
    }
}

/// Raw path extractor for custom-task routes (internal use)
#[derive(Debug, Deserialize)]
struct GroupTaskPathRaw {
    group_id: String,
    task_id: String,
}

/// Validated path extractor for group-scoped custom-task routes
#[derive(Debug)]
pub struct GroupTaskPath {
    pub group_id: String,
    pub task_id: String,
}

impl<S> FromRequestParts<S> for GroupTaskPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<GroupTaskPathRaw>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        if !is_valid_id(&raw.group_id) {
            return Err(ValidationRejection::InvalidGroupId);
        }
        if !is_valid_id(&raw.task_id) {
            return Err(ValidationRejection::InvalidTaskId);
        }

        Ok(Self {
            group_id: raw.group_id,
            task_id: raw.task_id,
        })
    }
}

/// Validation rejection with structured error response
pub enum ValidationRejection {
    /// Failed to parse path parameters
    Path(PathRejection),
    /// Invalid group_id format
    InvalidGroupId,
    /// Invalid task_id format
    InvalidTaskId,
    /// Failed to parse query string
    Query(QueryRejection),
    /// Failed to parse JSON body
    Json(JsonRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Path(rejection) => (
                StatusCode::BAD_REQUEST,
                "PATH_PARSE_ERROR",
                rejection.body_text(),
            ),
            Self::InvalidGroupId => (
                StatusCode::BAD_REQUEST,
                "INVALID_GROUP_ID",
                "Invalid group_id: must be 1-64 alphanumeric chars, dashes, or underscores"
                    .to_string(),
            ),
            Self::InvalidTaskId => (
                StatusCode::BAD_REQUEST,
                "INVALID_TASK_ID",
                "Invalid task_id: must be 1-64 alphanumeric chars, dashes, or underscores"
                    .to_string(),
            ),
            Self::Query(rejection) => (
                StatusCode::BAD_REQUEST,
                "QUERY_PARSE_ERROR",
                rejection.body_text(),
            ),
            Self::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                "JSON_PARSE_ERROR",
                rejection.body_text(),
            ),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format_validation_errors(&errors),
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": "bad_request",
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Query extractor with automatic validation.
///
/// Deserializes query parameters and validates them using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Query)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

/// JSON body extractor with automatic validation.
///
/// Deserializes JSON body and validates it using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("grp_abc123"));
        assert!(is_valid_id("y3jq0mhvlt8pazxk2w5n9d4c"));
        assert!(is_valid_id("a"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(&"x".repeat(65)));
        assert!(!is_valid_id("has space"));
        assert!(!is_valid_id("semi;colon"));
    }
}
