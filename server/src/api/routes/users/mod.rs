//! User API endpoints

pub mod types;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::core::constants::DEFAULT_TIMEZONE;
use crate::data::postgres::PgPool;
use crate::data::postgres::repositories::{achievement, group, settings, user};
use crate::domain::challenge::parse_timezone;

use types::{
    AchievementDto, SettingsDto, UpdateSettingsRequest, UpdateUserRequest, UserDto, UserGroupDto,
    UserProfileResponse,
};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub pool: PgPool,
}

/// Build Users API routes
pub fn routes(pool: PgPool) -> Router<()> {
    let state = UsersApiState { pool };

    Router::new()
        .route("/me", get(get_current_user).put(update_current_user))
        .route("/me/achievements", get(list_achievements))
        .route("/me/settings", get(get_settings).put(update_settings))
        .with_state(state)
}

/// Get the current user's profile, groups, and achievements
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "User profile", body = UserProfileResponse)
    )
)]
pub async fn get_current_user(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<Json<UserProfileResponse>, ApiError> {
    user::ensure_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    let profile = user::get_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;

    let groups = group::list_for_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;
    let achievements = achievement::list_for_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(UserProfileResponse {
        user: UserDto::from(profile),
        groups: groups.into_iter().map(UserGroupDto::from).collect(),
        achievements: achievements.into_iter().map(AchievementDto::from).collect(),
    }))
}

/// List the current user's earned streak milestones
#[utoipa::path(
    get,
    path = "/api/v1/users/me/achievements",
    tag = "users",
    responses(
        (status = 200, description = "Earned achievements", body = [AchievementDto])
    )
)]
pub async fn list_achievements(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<Json<Vec<AchievementDto>>, ApiError> {
    let achievements = achievement::list_for_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(
        achievements.into_iter().map(AchievementDto::from).collect(),
    ))
}

/// Update the current user's display name
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_current_user(
    State(state): State<UsersApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    user::ensure_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    user::update_display_name(&state.pool, &auth.user_id, body.display_name.trim())
        .await
        .map_err(ApiError::from_postgres)?;

    let profile = user::get_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;

    Ok(Json(UserDto::from(profile)))
}

/// Get the current user's settings
#[utoipa::path(
    get,
    path = "/api/v1/users/me/settings",
    tag = "users",
    responses(
        (status = 200, description = "User settings", body = SettingsDto)
    )
)]
pub async fn get_settings(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<Json<SettingsDto>, ApiError> {
    let stored = settings::get_settings(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(SettingsDto {
        timezone: stored
            .map(|s| s.timezone)
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
    }))
}

/// Update the current user's timezone.
///
/// When the caller owns a group, this changes the squad's day boundary for
/// every member from the next request onward.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/settings",
    tag = "users",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = SettingsDto),
        (status = 400, description = "Unknown IANA timezone")
    )
)]
pub async fn update_settings(
    State(state): State<UsersApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<SettingsDto>, ApiError> {
    if parse_timezone(Some(&body.timezone)).is_none() {
        return Err(ApiError::bad_request(
            "INVALID_TIMEZONE",
            format!("Unknown IANA timezone: {}", body.timezone),
        ));
    }

    user::ensure_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    let updated = settings::upsert_timezone(&state.pool, &auth.user_id, &body.timezone)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(SettingsDto {
        timezone: updated.timezone,
    }))
}
