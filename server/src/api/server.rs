//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{completions, groups, health, users};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);

        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);
        let pool = app.database.pool().clone();

        let router = Router::new()
            .route("/api/v1/health", get(health::health))
            .route("/api/openapi.json", get(openapi_json))
            .route("/api/docs", get(swagger_ui_html))
            .route("/api/docs/", get(swagger_ui_html))
            .nest(
                "/api/v1/groups",
                groups::routes(pool.clone(), app.config.repair.clone()),
            )
            .nest(
                "/api/v1/groups/{group_id}/completions",
                completions::routes(pool.clone()),
            )
            .nest("/api/v1/users", users::routes(pool))
            .fallback(middleware::handle_404)
            .layer(CompressionLayer::new())
            .layer(middleware::cors(&allowed_origins))
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "API server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}
