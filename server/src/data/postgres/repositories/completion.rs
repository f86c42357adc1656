//! Task completion repository for PostgreSQL operations
//!
//! `task_completions` is the authoritative source of truth for streaks. The
//! unique constraint on (user_id, group_id, task_key, date) is the ground-truth
//! determinant of "does this completion already exist" under concurrent
//! toggles; a prior read never is.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::parse_date;
use crate::data::postgres::PostgresError;
use crate::data::types::CompletionRow;

type CompletionTuple = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    i64,
);

fn row_to_completion(row: CompletionTuple) -> Result<CompletionRow, PostgresError> {
    let (id, user_id, group_id, task_key, date, note, completed_at) = row;
    Ok(CompletionRow {
        id,
        user_id,
        group_id,
        task_key,
        date: parse_date(&date)?,
        note,
        completed_at,
    })
}

/// Insert a completion if absent.
///
/// Returns `None` when the row already existed (benign conflict: under two
/// concurrent identical toggles the first writer's row stands).
pub async fn insert_if_absent(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    task_key: &str,
    date: NaiveDate,
    note: Option<&str>,
) -> Result<Option<CompletionRow>, PostgresError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO task_completions (id, user_id, group_id, task_key, date, note, completed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, group_id, task_key, date) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(group_id)
    .bind(task_key)
    .bind(date.to_string())
    .bind(note)
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(CompletionRow {
        id,
        user_id: user_id.to_string(),
        group_id: group_id.to_string(),
        task_key: task_key.to_string(),
        date,
        note: note.map(str::to_string),
        completed_at: now,
    }))
}

/// Delete a completion if present. Returns whether a row was removed.
pub async fn delete_if_present(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    task_key: &str,
    date: NaiveDate,
) -> Result<bool, PostgresError> {
    let result = sqlx::query(
        "DELETE FROM task_completions
         WHERE user_id = $1 AND group_id = $2 AND task_key = $3 AND date = $4",
    )
    .bind(user_id)
    .bind(group_id)
    .bind(task_key)
    .bind(date.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Check whether a completion exists for the exact (user, group, task, date) tuple
pub async fn exists(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    task_key: &str,
    date: NaiveDate,
) -> Result<bool, PostgresError> {
    let found: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM task_completions
         WHERE user_id = $1 AND group_id = $2 AND task_key = $3 AND date = $4",
    )
    .bind(user_id)
    .bind(group_id)
    .bind(task_key)
    .bind(date.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// List a user's completions in a group for the given task keys within a
/// closed date range (the streak engine's scan)
pub async fn list_in_range(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    task_keys: &[&str],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<CompletionRow>, PostgresError> {
    let keys: Vec<String> = task_keys.iter().map(|k| k.to_string()).collect();

    let rows = sqlx::query_as::<_, CompletionTuple>(
        r#"
        SELECT id, user_id, group_id, task_key, date, note, completed_at
        FROM task_completions
        WHERE user_id = $1 AND group_id = $2 AND task_key = ANY($3)
          AND date >= $4 AND date <= $5
        ORDER BY date ASC
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .bind(&keys)
    .bind(from.to_string())
    .bind(to.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_completion).collect()
}

/// List a user's completions in a group on a single date (all task keys,
/// including custom ones)
pub async fn list_on_date(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    date: NaiveDate,
) -> Result<Vec<CompletionRow>, PostgresError> {
    let rows = sqlx::query_as::<_, CompletionTuple>(
        r#"
        SELECT id, user_id, group_id, task_key, date, note, completed_at
        FROM task_completions
        WHERE user_id = $1 AND group_id = $2 AND date = $3
        ORDER BY completed_at ASC
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .bind(date.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_completion).collect()
}

/// List recent completions for a whole group, filtered by completion instant
/// (not stored date). Used by the repair utility.
pub async fn list_recent_for_group(
    pool: &PgPool,
    group_id: &str,
    completed_after: i64,
    limit: u32,
) -> Result<Vec<CompletionRow>, PostgresError> {
    let rows = sqlx::query_as::<_, CompletionTuple>(
        r#"
        SELECT id, user_id, group_id, task_key, date, note, completed_at
        FROM task_completions
        WHERE group_id = $1 AND completed_at >= $2
        ORDER BY completed_at DESC
        LIMIT $3
        "#,
    )
    .bind(group_id)
    .bind(completed_after)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_completion).collect()
}

/// Rewrite a completion's stored date. Returns rows affected; zero means the
/// row vanished between scan and update, which callers treat as a no-op.
pub async fn update_date(
    pool: &PgPool,
    id: &str,
    new_date: NaiveDate,
) -> Result<u64, PostgresError> {
    let result = sqlx::query("UPDATE task_completions SET date = $1 WHERE id = $2")
        .bind(new_date.to_string())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete a completion by ID. Returns whether a row was removed.
pub async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, PostgresError> {
    let result = sqlx::query("DELETE FROM task_completions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count per-member completions of the given task keys on a date, for every
/// member of a group (squad status view)
pub async fn count_on_date_by_member(
    pool: &PgPool,
    group_id: &str,
    task_keys: &[&str],
    date: NaiveDate,
) -> Result<Vec<(String, i64)>, PostgresError> {
    let keys: Vec<String> = task_keys.iter().map(|k| k.to_string()).collect();

    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT user_id, COUNT(*)
        FROM task_completions
        WHERE group_id = $1 AND task_key = ANY($2) AND date = $3
        GROUP BY user_id
        "#,
    )
    .bind(group_id)
    .bind(&keys)
    .bind(date.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
