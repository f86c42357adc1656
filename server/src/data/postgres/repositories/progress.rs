//! Challenge progress repository for PostgreSQL operations
//!
//! `challenge_progress` is a derived cache over the completion log. Rows are
//! created lazily on first access and only ever rewritten by the reconciler.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::{parse_date, parse_date_opt};
use crate::data::postgres::PostgresError;
use crate::data::types::ProgressRow;

type ProgressTuple = (
    String,
    String,
    String,
    String,
    i32,
    Option<String>,
    bool,
    i64,
    i64,
);

fn row_to_progress(row: ProgressTuple) -> Result<ProgressRow, PostgresError> {
    let (
        id,
        user_id,
        group_id,
        start_date,
        current_streak,
        last_completed_date,
        is_active,
        created_at,
        updated_at,
    ) = row;

    Ok(ProgressRow {
        id,
        user_id,
        group_id,
        start_date: parse_date(&start_date)?,
        current_streak: current_streak.max(0) as u32,
        last_completed_date: parse_date_opt(last_completed_date.as_deref())?,
        is_active,
        created_at,
        updated_at,
    })
}

/// Get the progress row for (user, group)
pub async fn get_progress(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
) -> Result<Option<ProgressRow>, PostgresError> {
    let row = sqlx::query_as::<_, ProgressTuple>(
        r#"
        SELECT id, user_id, group_id, start_date, current_streak, last_completed_date,
               is_active, created_at, updated_at
        FROM challenge_progress
        WHERE user_id = $1 AND group_id = $2
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .fetch_optional(pool)
    .await?;

    row.map(row_to_progress).transpose()
}

/// Ensure a progress row exists for (user, group), creating it with streak 0
/// if absent. Concurrent creators race benignly: the loser's insert is a
/// no-op and both read back the surviving row.
pub async fn ensure_progress(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    start_date: NaiveDate,
) -> Result<ProgressRow, PostgresError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO challenge_progress
            (id, user_id, group_id, start_date, current_streak, last_completed_date,
             is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 0, NULL, TRUE, $5, $6)
        ON CONFLICT (user_id, group_id) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(group_id)
    .bind(start_date.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_progress(pool, user_id, group_id)
        .await?
        .ok_or_else(|| PostgresError::Conflict("Progress insert did not persist".into()))
}

/// Overwrite a stale start_date (catch-up after the squad timezone was healed)
pub async fn update_start_date(
    pool: &PgPool,
    id: &str,
    start_date: NaiveDate,
) -> Result<(), PostgresError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query("UPDATE challenge_progress SET start_date = $1, updated_at = $2 WHERE id = $3")
        .bind(start_date.to_string())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Persist a recomputed streak
pub async fn update_streak(
    pool: &PgPool,
    id: &str,
    current_streak: u32,
    last_completed_date: Option<NaiveDate>,
) -> Result<(), PostgresError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE challenge_progress
         SET current_streak = $1, last_completed_date = $2, updated_at = $3
         WHERE id = $4",
    )
    .bind(current_streak as i32)
    .bind(last_completed_date.map(|d| d.to_string()))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get all progress rows for a group (squad status view)
pub async fn list_for_group(
    pool: &PgPool,
    group_id: &str,
) -> Result<Vec<ProgressRow>, PostgresError> {
    let rows = sqlx::query_as::<_, ProgressTuple>(
        r#"
        SELECT id, user_id, group_id, start_date, current_streak, last_completed_date,
               is_active, created_at, updated_at
        FROM challenge_progress
        WHERE group_id = $1
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_progress).collect()
}
