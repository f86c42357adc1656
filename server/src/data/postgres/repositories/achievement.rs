//! User achievement repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::AchievementRow;

/// Award an achievement idempotently. Returns whether the award was new;
/// a duplicate key is success, not an error.
pub async fn award(
    pool: &PgPool,
    user_id: &str,
    achievement_key: &str,
) -> Result<bool, PostgresError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO user_achievements (user_id, achievement_key, earned_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, achievement_key) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(achievement_key)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List all achievements a user has earned
pub async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<AchievementRow>, PostgresError> {
    let rows = sqlx::query_as::<_, (String, String, i64)>(
        "SELECT user_id, achievement_key, earned_at
         FROM user_achievements
         WHERE user_id = $1
         ORDER BY earned_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(user_id, achievement_key, earned_at)| AchievementRow {
            user_id,
            achievement_key,
            earned_at,
        })
        .collect())
}
