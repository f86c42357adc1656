//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{completions, groups, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hard75 API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Squad accountability tracker for the 75 Hard challenge"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "groups", description = "Squad management and status"),
        (name = "completions", description = "Daily task completions"),
        (name = "users", description = "User profile and settings")
    ),
    paths(
        // Health
        health::health,
        // Groups
        groups::list_groups,
        groups::create_group,
        groups::join_group,
        groups::get_group,
        groups::group_status,
        groups::list_custom_tasks,
        groups::create_custom_task,
        groups::delete_custom_task,
        // Completions
        completions::toggle_completion,
        completions::list_completions,
        // Users
        users::get_current_user,
        users::update_current_user,
        users::list_achievements,
        users::get_settings,
        users::update_settings,
    ),
    components(schemas(
        // Health
        health::HealthResponse,
        // Groups
        groups::types::GroupDto,
        groups::types::GroupWithRoleDto,
        groups::types::MemberDto,
        groups::types::GroupDetailResponse,
        groups::types::CreateGroupRequest,
        groups::types::JoinGroupRequest,
        groups::types::JoinGroupResponse,
        groups::types::StatusQuery,
        groups::types::MemberStatusDto,
        groups::types::GroupStatusResponse,
        groups::types::CreateCustomTaskRequest,
        groups::types::CustomTaskDto,
        // Completions
        completions::types::ToggleCompletionRequest,
        completions::types::ToggleCompletionResponse,
        completions::types::ListCompletionsQuery,
        completions::types::CompletionDto,
        completions::types::ListCompletionsResponse,
        // Users
        users::types::UserDto,
        users::types::UserGroupDto,
        users::types::AchievementDto,
        users::types::UserProfileResponse,
        users::types::UpdateUserRequest,
        users::types::SettingsDto,
        users::types::UpdateSettingsRequest,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Hard75 API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
