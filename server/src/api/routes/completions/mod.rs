//! Task completion API endpoints
//!
//! The toggle is deliberately not transactional with the streak
//! reconciliation that follows it: `task_completions` is the source of truth
//! and `challenge_progress` is a cache, so a failure between the two leaves a
//! state the next successful request repairs.

pub mod types;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::auth::Auth;
use crate::api::extractors::{GroupPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, parse_date_param};
use crate::core::constants::{DEFAULT_TIMEZONE, REQUIRED_TASK_KEYS};
use crate::data::postgres::PgPool;
use crate::data::postgres::repositories::{completion, custom_task, membership, user};
use crate::domain::challenge::{
    DayFloor, active_streak, day_number, ensure_and_reconcile_progress, local_date,
    parse_timezone, resolve_squad_start_date, resolve_squad_timezone,
};

use types::{
    CompletionDto, ListCompletionsQuery, ListCompletionsResponse, ToggleCompletionRequest,
    ToggleCompletionResponse,
};

/// Shared state for Completions API endpoints
#[derive(Clone)]
pub struct CompletionsApiState {
    pub pool: PgPool,
}

/// Build Completions API routes (nested under a group path)
pub fn routes(pool: PgPool) -> Router<()> {
    let state = CompletionsApiState { pool };

    Router::new()
        .route("/", get(list_completions))
        .route("/toggle", post(toggle_completion))
        .with_state(state)
}

async fn require_member(pool: &PgPool, group_id: &str, user_id: &str) -> Result<(), ApiError> {
    let member = membership::is_member(pool, group_id, user_id)
        .await
        .map_err(ApiError::from_postgres)?;
    if !member {
        return Err(ApiError::forbidden(
            "NOT_A_MEMBER",
            "You are not a member of this group",
        ));
    }
    Ok(())
}

/// A toggleable task is either one of the five required tasks or one of the
/// caller's own custom tasks in this group
async fn validate_task_key(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    task_key: &str,
) -> Result<(), ApiError> {
    if REQUIRED_TASK_KEYS.contains(&task_key) {
        return Ok(());
    }

    let customs = custom_task::list_for_user(pool, user_id, group_id)
        .await
        .map_err(ApiError::from_postgres)?;
    if customs.iter().any(|t| t.label == task_key) {
        return Ok(());
    }

    Err(ApiError::bad_request(
        "UNKNOWN_TASK",
        format!("Unknown task: {}", task_key),
    ))
}

/// How a toggle write resolved against the completion log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToggleOutcome {
    TurnedOff,
    TurnedOn,
    /// Our insert conflicted: a concurrent request completed the task first
    AlreadyOn,
}

impl ToggleOutcome {
    fn completed(self) -> bool {
        !matches!(self, ToggleOutcome::TurnedOff)
    }
}

fn classify_toggle(was_present: bool, inserted: bool) -> ToggleOutcome {
    match (was_present, inserted) {
        (true, _) => ToggleOutcome::TurnedOff,
        (false, true) => ToggleOutcome::TurnedOn,
        (false, false) => ToggleOutcome::AlreadyOn,
    }
}

/// Toggle a task completion for a squad-local date, then reconcile the
/// caller's streak
#[utoipa::path(
    post,
    path = "/api/v1/groups/{group_id}/completions/toggle",
    tag = "completions",
    params(
        ("group_id" = String, Path, description = "Group ID")
    ),
    request_body = ToggleCompletionRequest,
    responses(
        (status = 200, description = "Completion toggled", body = ToggleCompletionResponse),
        (status = 400, description = "Unknown task or invalid date/timezone"),
        (status = 403, description = "Not a member of this group")
    )
)]
pub async fn toggle_completion(
    State(state): State<CompletionsApiState>,
    auth: Auth,
    path: GroupPath,
    ValidatedJson(body): ValidatedJson<ToggleCompletionRequest>,
) -> Result<Json<ToggleCompletionResponse>, ApiError> {
    require_member(&state.pool, &path.group_id, &auth.user_id).await?;
    validate_task_key(&state.pool, &auth.user_id, &path.group_id, &body.task_key).await?;
    user::ensure_user(&state.pool, &auth.user_id)
        .await
        .map_err(ApiError::from_postgres)?;

    let fallback_tz = body.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
    let tz_name =
        resolve_squad_timezone(&state.pool, &path.group_id, fallback_tz, &auth.user_id).await;
    let tz = parse_timezone(Some(&tz_name)).unwrap_or(chrono_tz::UTC);

    let today = local_date(Utc::now(), tz);
    let date = parse_date_param(&body.date)?.unwrap_or(today);

    // Toggling off deletes the observed row; toggling on inserts under the
    // unique constraint on (user_id, group_id, task_key, date). Losing an
    // insert race to a concurrent request leaves the winner's row standing
    // and lands this request on the same side of the toggle, never an
    // uncheck.
    let was_present = completion::exists(
        &state.pool,
        &auth.user_id,
        &path.group_id,
        &body.task_key,
        date,
    )
    .await
    .map_err(ApiError::from_postgres)?;

    let inserted = if was_present {
        completion::delete_if_present(
            &state.pool,
            &auth.user_id,
            &path.group_id,
            &body.task_key,
            date,
        )
        .await
        .map_err(ApiError::from_postgres)?;
        false
    } else {
        completion::insert_if_absent(
            &state.pool,
            &auth.user_id,
            &path.group_id,
            &body.task_key,
            date,
            body.note.as_deref(),
        )
        .await
        .map_err(ApiError::from_postgres)?
        .is_some()
    };

    let outcome = classify_toggle(was_present, inserted);
    if outcome == ToggleOutcome::AlreadyOn {
        tracing::debug!(task_key = %body.task_key, "Concurrent completion insert, keeping existing row");
    }
    let completed = outcome.completed();

    let start = resolve_squad_start_date(&state.pool, &path.group_id, tz, today).await;
    let record =
        ensure_and_reconcile_progress(&state.pool, &auth.user_id, &path.group_id, start, today)
            .await
            .map_err(ApiError::from_postgres)?;

    Ok(Json(ToggleCompletionResponse {
        task_key: body.task_key,
        date: date.to_string(),
        completed,
        streak: active_streak(&record, today),
        day_number: day_number(start, today, DayFloor::Zero),
    }))
}

/// List the caller's completions on a squad-local date
#[utoipa::path(
    get,
    path = "/api/v1/groups/{group_id}/completions",
    tag = "completions",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        ("date" = Option<String>, Query, description = "Date to view (YYYY-MM-DD)"),
        ("tz" = Option<String>, Query, description = "Caller's IANA timezone")
    ),
    responses(
        (status = 200, description = "Completions on the date", body = ListCompletionsResponse),
        (status = 403, description = "Not a member of this group")
    )
)]
pub async fn list_completions(
    State(state): State<CompletionsApiState>,
    auth: Auth,
    path: GroupPath,
    ValidatedQuery(query): ValidatedQuery<ListCompletionsQuery>,
) -> Result<Json<ListCompletionsResponse>, ApiError> {
    require_member(&state.pool, &path.group_id, &auth.user_id).await?;

    let fallback_tz = query.tz.as_deref().unwrap_or(DEFAULT_TIMEZONE);
    let tz_name =
        resolve_squad_timezone(&state.pool, &path.group_id, fallback_tz, &auth.user_id).await;
    let tz = parse_timezone(Some(&tz_name)).unwrap_or(chrono_tz::UTC);

    let today = local_date(Utc::now(), tz);
    let date = parse_date_param(&query.date)?.unwrap_or(today);
    let start = resolve_squad_start_date(&state.pool, &path.group_id, tz, today).await;

    let rows = completion::list_on_date(&state.pool, &auth.user_id, &path.group_id, date)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(ListCompletionsResponse {
        date: date.to_string(),
        day_number: day_number(start, date, DayFloor::One),
        completions: rows.into_iter().map(CompletionDto::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_off_when_row_was_present() {
        let outcome = classify_toggle(true, false);
        assert_eq!(outcome, ToggleOutcome::TurnedOff);
        assert!(!outcome.completed());
    }

    #[test]
    fn toggle_on_when_insert_lands() {
        let outcome = classify_toggle(false, true);
        assert_eq!(outcome, ToggleOutcome::TurnedOn);
        assert!(outcome.completed());
    }

    #[test]
    fn lost_insert_race_still_lands_completed() {
        // Two concurrent toggle-on requests: the loser's insert conflicts on
        // (user_id, group_id, task_key, date). The winner's row must stand
        // and the loser reports completed, so exactly one row remains and
        // neither caller sees an uncheck.
        let outcome = classify_toggle(false, false);
        assert_eq!(outcome, ToggleOutcome::AlreadyOn);
        assert!(outcome.completed());
    }
}
