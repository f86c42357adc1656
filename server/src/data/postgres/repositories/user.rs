//! User repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::UserRow;

/// Ensure a user row exists for an upstream-authenticated identity.
///
/// Identities arrive from the fronting auth layer; the first request from a new
/// user creates the row lazily.
pub async fn ensure_user(pool: &PgPool, user_id: &str) -> Result<(), PostgresError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO users (id, created_at, updated_at) VALUES ($1, $2, $3)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user by ID
pub async fn get_user(pool: &PgPool, id: &str) -> Result<Option<UserRow>, PostgresError> {
    let row = sqlx::query_as::<_, (String, Option<String>, Option<String>, i64, i64)>(
        "SELECT id, email, display_name, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(
        row.map(|(id, email, display_name, created_at, updated_at)| UserRow {
            id,
            email,
            display_name,
            created_at,
            updated_at,
        }),
    )
}

/// Update a user's display name
pub async fn update_display_name(
    pool: &PgPool,
    id: &str,
    display_name: &str,
) -> Result<bool, PostgresError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("UPDATE users SET display_name = $1, updated_at = $2 WHERE id = $3")
        .bind(display_name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
