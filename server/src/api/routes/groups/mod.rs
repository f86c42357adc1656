//! Group (squad) API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::auth::Auth;
use crate::api::extractors::{GroupPath, GroupTaskPath, ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::core::config::RepairConfig;
use crate::core::constants::{DEFAULT_TIMEZONE, GROUP_ROLE_MEMBER, REQUIRED_TASK_KEYS};
use crate::data::postgres::PgPool;
use crate::data::postgres::repositories::{
    completion, custom_task, group, membership, progress, settings, user,
};
use crate::domain::challenge::{
    DayFloor, RepairOptions, active_streak, day_number, ensure_and_reconcile_progress, local_date,
    parse_timezone, repair_group_completion_dates, resolve_squad_start_date,
    resolve_squad_timezone,
};

use types::{
    CreateCustomTaskRequest, CreateGroupRequest, CustomTaskDto, GroupDetailResponse, GroupDto,
    GroupStatusResponse, GroupWithRoleDto, JoinGroupRequest, JoinGroupResponse, MemberDto,
    MemberStatusDto, StatusQuery,
};

/// Shared state for Groups API endpoints
#[derive(Clone)]
pub struct GroupsApiState {
    pub pool: PgPool,
    pub repair: RepairConfig,
}

/// Build Groups API routes
pub fn routes(pool: PgPool, repair: RepairConfig) -> Router<()> {
    let state = GroupsApiState { pool, repair };

    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/join", post(join_group))
        .route("/{group_id}", get(get_group))
        .route("/{group_id}/status", get(group_status))
        .route(
            "/{group_id}/custom-tasks",
            get(list_custom_tasks).post(create_custom_task),
        )
        .route("/{group_id}/custom-tasks/{task_id}", delete(delete_custom_task))
        .with_state(state)
}

/// Require that the caller belongs to the group, returning their role
async fn require_membership(
    pool: &PgPool,
    group_id: &str,
    user_id: &str,
) -> Result<String, ApiError> {
    membership::get_membership(pool, group_id, user_id)
        .await
        .map_err(ApiError::from_postgres)?
        .map(|m| m.role)
        .ok_or_else(|| ApiError::forbidden("NOT_A_MEMBER", "You are not a member of this group"))
}

/// List groups the current user belongs to
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    tag = "groups",
    responses(
        (status = 200, description = "Groups the caller belongs to", body = [GroupWithRoleDto])
    )
)]
pub async fn list_groups(
    State(state): State<GroupsApiState>,
    auth: Auth,
) -> Result<Json<Vec<GroupWithRoleDto>>, ApiError> {
    let groups = group::list_for_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(
        groups.into_iter().map(GroupWithRoleDto::from).collect(),
    ))
}

/// Create a new group (caller becomes admin)
#[utoipa::path(
    post,
    path = "/api/v1/groups",
    tag = "groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupDto),
        (status = 400, description = "Invalid name or timezone")
    )
)]
pub async fn create_group(
    State(state): State<GroupsApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupDto>), ApiError> {
    user::ensure_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    // Capture the creator's timezone up front: it defines the squad's day
    // boundary from the first request onward
    if let Some(tz) = &body.timezone {
        if parse_timezone(Some(tz)).is_none() {
            return Err(ApiError::bad_request(
                "INVALID_TIMEZONE",
                format!("Unknown IANA timezone: {}", tz),
            ));
        }
        settings::upsert_timezone(&state.pool, &auth.user_id, tz)
            .await
            .map_err(ApiError::from_postgres)?;
    }

    let created = group::create_group_with_owner(&state.pool, &body.name, &auth.user_id)
        .await
        .map_err(|e| match e {
            crate::data::postgres::PostgresError::Conflict(_) => ApiError::internal(
                "Could not allocate a unique invite code, please retry".to_string(),
            ),
            other => ApiError::from_postgres(other),
        })?;

    Ok((StatusCode::CREATED, Json(GroupDto::from(created))))
}

/// Join a group by invite code
#[utoipa::path(
    post,
    path = "/api/v1/groups/join",
    tag = "groups",
    request_body = JoinGroupRequest,
    responses(
        (status = 200, description = "Joined (idempotent for existing members)", body = JoinGroupResponse),
        (status = 404, description = "Invite code does not match any group")
    )
)]
pub async fn join_group(
    State(state): State<GroupsApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<JoinGroupRequest>,
) -> Result<Json<JoinGroupResponse>, ApiError> {
    // Codes are generated uppercase; accept lowercase input
    let code = body.invite_code.trim().to_uppercase();

    let found = group::get_group_by_invite_code(&state.pool, &code)
        .await
        .map_err(ApiError::from_postgres)?
        .ok_or_else(|| {
            ApiError::not_found("INVALID_INVITE_CODE", "No group with that invite code")
        })?;

    user::ensure_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    // Duplicate joins are a no-op; the stored role wins
    let member = membership::add_member(&state.pool, &found.id, &auth.user_id, GROUP_ROLE_MEMBER)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(JoinGroupResponse {
        group: GroupDto::from(found),
        role: member.role,
    }))
}

/// Get a single group with its member list
#[utoipa::path(
    get,
    path = "/api/v1/groups/{group_id}",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Group details", body = GroupDetailResponse),
        (status = 403, description = "Not a member of this group"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn get_group(
    State(state): State<GroupsApiState>,
    auth: Auth,
    path: GroupPath,
) -> Result<Json<GroupDetailResponse>, ApiError> {
    require_membership(&state.pool, &path.group_id, &auth.user_id).await?;

    let found = group::get_group(&state.pool, &path.group_id)
        .await
        .map_err(ApiError::from_postgres)?
        .ok_or_else(|| {
            ApiError::not_found(
                "GROUP_NOT_FOUND",
                format!("Group not found: {}", path.group_id),
            )
        })?;

    let members = membership::list_members(&state.pool, &path.group_id)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(GroupDetailResponse {
        group: GroupDto::from(found),
        members: members.into_iter().map(MemberDto::from).collect(),
    }))
}

/// Squad status: shared day number plus every member's live streak and
/// required-task count for today
#[utoipa::path(
    get,
    path = "/api/v1/groups/{group_id}/status",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        ("tz" = Option<String>, Query, description = "Caller's IANA timezone")
    ),
    responses(
        (status = 200, description = "Squad status", body = GroupStatusResponse),
        (status = 403, description = "Not a member of this group"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn group_status(
    State(state): State<GroupsApiState>,
    auth: Auth,
    path: GroupPath,
    ValidatedQuery(query): ValidatedQuery<StatusQuery>,
) -> Result<Json<GroupStatusResponse>, ApiError> {
    require_membership(&state.pool, &path.group_id, &auth.user_id).await?;

    let found = group::get_group(&state.pool, &path.group_id)
        .await
        .map_err(ApiError::from_postgres)?
        .ok_or_else(|| {
            ApiError::not_found(
                "GROUP_NOT_FOUND",
                format!("Group not found: {}", path.group_id),
            )
        })?;

    let fallback_tz = query.tz.as_deref().unwrap_or(DEFAULT_TIMEZONE);
    let tz_name =
        resolve_squad_timezone(&state.pool, &path.group_id, fallback_tz, &auth.user_id).await;
    let tz = parse_timezone(Some(&tz_name)).unwrap_or(chrono_tz::UTC);

    let today = local_date(Utc::now(), tz);
    let start = resolve_squad_start_date(&state.pool, &path.group_id, tz, today).await;

    // Owner views trigger a best-effort repair of recently misdated rows
    // before anything is recomputed from them
    if found.owner_id == auth.user_id {
        let options = RepairOptions {
            lookback_days: state.repair.lookback_days,
            max_rows: state.repair.max_rows,
        };
        repair_group_completion_dates(&state.pool, &path.group_id, tz, options).await;
    }

    ensure_and_reconcile_progress(&state.pool, &auth.user_id, &path.group_id, start, today)
        .await
        .map_err(ApiError::from_postgres)?;

    let members = membership::list_members(&state.pool, &path.group_id)
        .await
        .map_err(ApiError::from_postgres)?;
    let progresses = progress::list_for_group(&state.pool, &path.group_id)
        .await
        .map_err(ApiError::from_postgres)?;
    let counts =
        completion::count_on_date_by_member(&state.pool, &path.group_id, &REQUIRED_TASK_KEYS, today)
            .await
            .map_err(ApiError::from_postgres)?;

    let streak_by_user: std::collections::HashMap<&str, u32> = progresses
        .iter()
        .map(|p| (p.user_id.as_str(), active_streak(p, today)))
        .collect();
    let count_by_user: std::collections::HashMap<&str, u32> = counts
        .iter()
        .map(|(user_id, n)| (user_id.as_str(), *n as u32))
        .collect();

    let tasks_total = REQUIRED_TASK_KEYS.len() as u32;
    let mut members: Vec<MemberStatusDto> = members
        .into_iter()
        .map(|m| {
            let completed_today = count_by_user.get(m.user_id.as_str()).copied().unwrap_or(0);
            MemberStatusDto {
                streak: streak_by_user.get(m.user_id.as_str()).copied().unwrap_or(0),
                completed_today,
                tasks_total,
                day_complete: completed_today >= tasks_total,
                user_id: m.user_id,
                display_name: m.display_name,
                role: m.role,
            }
        })
        .collect();

    // Leaderboard order: longest streak first, today's progress breaks ties
    members.sort_by(|a, b| {
        b.streak
            .cmp(&a.streak)
            .then(b.completed_today.cmp(&a.completed_today))
            .then(a.user_id.cmp(&b.user_id))
    });

    Ok(Json(GroupStatusResponse {
        group_id: path.group_id,
        timezone: tz_name,
        date: today.to_string(),
        day_number: day_number(start, today, DayFloor::Zero),
        members,
    }))
}

/// List the caller's custom tasks in a group
#[utoipa::path(
    get,
    path = "/api/v1/groups/{group_id}/custom-tasks",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Caller's custom tasks", body = [CustomTaskDto]),
        (status = 403, description = "Not a member of this group")
    )
)]
pub async fn list_custom_tasks(
    State(state): State<GroupsApiState>,
    auth: Auth,
    path: GroupPath,
) -> Result<Json<Vec<CustomTaskDto>>, ApiError> {
    require_membership(&state.pool, &path.group_id, &auth.user_id).await?;

    let tasks = custom_task::list_for_user(&state.pool, &auth.user_id, &path.group_id)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(tasks.into_iter().map(CustomTaskDto::from).collect()))
}

/// Add a custom task to the caller's checklist. Custom tasks never count
/// toward streaks.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{group_id}/custom-tasks",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID")
    ),
    request_body = CreateCustomTaskRequest,
    responses(
        (status = 201, description = "Custom task created", body = CustomTaskDto),
        (status = 403, description = "Not a member of this group"),
        (status = 409, description = "Label already exists in this group")
    )
)]
pub async fn create_custom_task(
    State(state): State<GroupsApiState>,
    auth: Auth,
    path: GroupPath,
    ValidatedJson(body): ValidatedJson<CreateCustomTaskRequest>,
) -> Result<(StatusCode, Json<CustomTaskDto>), ApiError> {
    require_membership(&state.pool, &path.group_id, &auth.user_id).await?;

    let created = custom_task::create_custom_task(
        &state.pool,
        &auth.user_id,
        &path.group_id,
        body.label.trim(),
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            ApiError::conflict("LABEL_EXISTS", "You already have a task with this label")
        } else {
            ApiError::from_postgres(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(CustomTaskDto::from(created))))
}

/// Delete one of the caller's custom tasks
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{group_id}/custom-tasks/{task_id}",
    tag = "groups",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        ("task_id" = String, Path, description = "Custom task ID")
    ),
    responses(
        (status = 204, description = "Custom task deleted"),
        (status = 404, description = "Custom task not found")
    )
)]
pub async fn delete_custom_task(
    State(state): State<GroupsApiState>,
    auth: Auth,
    path: GroupTaskPath,
) -> Result<StatusCode, ApiError> {
    require_membership(&state.pool, &path.group_id, &auth.user_id).await?;

    let deleted = custom_task::delete_custom_task(&state.pool, &auth.user_id, &path.task_id)
        .await
        .map_err(ApiError::from_postgres)?;

    if !deleted {
        return Err(ApiError::not_found(
            "TASK_NOT_FOUND",
            format!("Custom task not found: {}", path.task_id),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
