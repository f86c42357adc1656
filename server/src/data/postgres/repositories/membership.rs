//! Group membership repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::{MemberWithUser, MembershipRow};

/// Add a member to a group. A duplicate join is a no-op; the existing
/// membership row (and role) stands.
pub async fn add_member(
    pool: &PgPool,
    group_id: &str,
    user_id: &str,
    role: &str,
) -> Result<MembershipRow, PostgresError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO group_members (group_id, user_id, role, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (group_id, user_id) DO NOTHING
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    get_membership(pool, group_id, user_id)
        .await?
        .ok_or_else(|| PostgresError::Conflict("Membership insert did not persist".into()))
}

/// Get a specific membership
pub async fn get_membership(
    pool: &PgPool,
    group_id: &str,
    user_id: &str,
) -> Result<Option<MembershipRow>, PostgresError> {
    let row = sqlx::query_as::<_, (String, String, String, i64)>(
        r#"
        SELECT group_id, user_id, role, created_at
        FROM group_members
        WHERE group_id = $1 AND user_id = $2
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(
        row.map(|(group_id, user_id, role, created_at)| MembershipRow {
            group_id,
            user_id,
            role,
            created_at,
        }),
    )
}

/// Check whether a user is a member of a group
pub async fn is_member(
    pool: &PgPool,
    group_id: &str,
    user_id: &str,
) -> Result<bool, PostgresError> {
    Ok(get_membership(pool, group_id, user_id).await?.is_some())
}

/// List all members of a group with user info
pub async fn list_members(
    pool: &PgPool,
    group_id: &str,
) -> Result<Vec<MemberWithUser>, PostgresError> {
    let rows = sqlx::query_as::<_, (String, Option<String>, String, i64)>(
        r#"
        SELECT u.id, u.display_name, gm.role, gm.created_at
        FROM group_members gm
        JOIN users u ON gm.user_id = u.id
        WHERE gm.group_id = $1
        ORDER BY gm.created_at ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(user_id, display_name, role, joined_at)| MemberWithUser {
            user_id,
            display_name,
            role,
            joined_at,
        })
        .collect())
}
