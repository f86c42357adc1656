//! Health check endpoint

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::constants::APP_NAME_LOWER;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    fn ok() -> Self {
        Self {
            status: "ok",
            service: APP_NAME_LOWER,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Liveness probe reporting service identity and version
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_service_identity() {
        let body = serde_json::to_value(HealthResponse::ok()).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "hard75");
        assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
    }
}
