//! Custom task repository for PostgreSQL operations
//!
//! Custom tasks are user-defined checklist extras. They never count toward
//! streaks or day completion.

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::CustomTaskRow;

/// Create a custom task. A duplicate label for the same (user, group) is a
/// conflict surfaced to the caller.
pub async fn create_custom_task(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    label: &str,
) -> Result<CustomTaskRow, PostgresError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO custom_tasks (id, user_id, group_id, label, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(group_id)
    .bind(label)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(CustomTaskRow {
        id,
        user_id: user_id.to_string(),
        group_id: group_id.to_string(),
        label: label.to_string(),
        created_at: now,
    })
}

/// List a user's custom tasks in a group
pub async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
) -> Result<Vec<CustomTaskRow>, PostgresError> {
    let rows = sqlx::query_as::<_, (String, String, String, String, i64)>(
        "SELECT id, user_id, group_id, label, created_at
         FROM custom_tasks
         WHERE user_id = $1 AND group_id = $2
         ORDER BY created_at ASC",
    )
    .bind(user_id)
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, user_id, group_id, label, created_at)| CustomTaskRow {
            id,
            user_id,
            group_id,
            label,
            created_at,
        })
        .collect())
}

/// Delete a custom task, scoped to its owner. Returns whether a row was removed.
pub async fn delete_custom_task(
    pool: &PgPool,
    user_id: &str,
    task_id: &str,
) -> Result<bool, PostgresError> {
    let result = sqlx::query("DELETE FROM custom_tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
