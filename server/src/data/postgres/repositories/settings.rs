//! User settings repository for PostgreSQL operations
//!
//! The stored timezone is the authoritative input to squad timezone resolution;
//! 'UTC' doubles as the bootstrap placeholder for accounts created before
//! capture existed, which is why the resolver treats it as healable.

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::UserSettingsRow;

/// Get settings for a user
pub async fn get_settings(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<UserSettingsRow>, PostgresError> {
    let row = sqlx::query_as::<_, (String, String, i64, i64)>(
        "SELECT user_id, timezone, created_at, updated_at FROM user_settings WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(
        row.map(|(user_id, timezone, created_at, updated_at)| UserSettingsRow {
            user_id,
            timezone,
            created_at,
            updated_at,
        }),
    )
}

/// Upsert a user's timezone (also used by the timezone self-healing path)
pub async fn upsert_timezone(
    pool: &PgPool,
    user_id: &str,
    timezone: &str,
) -> Result<UserSettingsRow, PostgresError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, timezone, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE SET
            timezone = EXCLUDED.timezone,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(user_id)
    .bind(timezone)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(UserSettingsRow {
        user_id: user_id.to_string(),
        timezone: timezone.to_string(),
        created_at: now,
        updated_at: now,
    })
}
