//! Group (squad) repository for PostgreSQL operations

use rand::Rng;
use sqlx::PgPool;

use crate::core::constants::{GROUP_ROLE_ADMIN, INVITE_CODE_LEN, INVITE_CODE_MAX_RETRIES};
use crate::data::postgres::PostgresError;
use crate::data::types::{GroupRow, GroupWithRole};

/// Alphabet for invite codes. Excludes 0/O and 1/I to keep codes readable
/// when shared out loud.
const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random invite code
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..INVITE_CODE_CHARSET.len());
            INVITE_CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Create a group with the owner as admin member atomically.
///
/// Invite codes are globally unique; a collision with an existing code is
/// retried with a freshly generated one.
pub async fn create_group_with_owner(
    pool: &PgPool,
    name: &str,
    owner_id: &str,
) -> Result<GroupRow, PostgresError> {
    let mut last_err: Option<PostgresError> = None;

    for attempt in 0..INVITE_CODE_MAX_RETRIES {
        let invite_code = generate_invite_code();

        match try_create(pool, name, owner_id, &invite_code).await {
            Ok(group) => return Ok(group),
            Err(e) if e.is_unique_violation() => {
                tracing::debug!(attempt, "Invite code collision, regenerating");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        PostgresError::Conflict("Could not generate a unique invite code".into())
    }))
}

async fn try_create(
    pool: &PgPool,
    name: &str,
    owner_id: &str,
    invite_code: &str,
) -> Result<GroupRow, PostgresError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO groups (id, name, invite_code, owner_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&id)
    .bind(name)
    .bind(invite_code)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO group_members (group_id, user_id, role, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(&id)
    .bind(owner_id)
    .bind(GROUP_ROLE_ADMIN)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(GroupRow {
        id,
        name: name.to_string(),
        invite_code: invite_code.to_string(),
        owner_id: owner_id.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a group by ID
pub async fn get_group(pool: &PgPool, id: &str) -> Result<Option<GroupRow>, PostgresError> {
    let row = sqlx::query_as::<_, (String, String, String, String, i64, i64)>(
        "SELECT id, name, invite_code, owner_id, created_at, updated_at FROM groups WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_group))
}

/// Get a group by its unique invite code
pub async fn get_group_by_invite_code(
    pool: &PgPool,
    invite_code: &str,
) -> Result<Option<GroupRow>, PostgresError> {
    let row = sqlx::query_as::<_, (String, String, String, String, i64, i64)>(
        "SELECT id, name, invite_code, owner_id, created_at, updated_at
         FROM groups WHERE invite_code = $1",
    )
    .bind(invite_code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_group))
}

/// List groups a user belongs to, with their role
pub async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<GroupWithRole>, PostgresError> {
    let rows = sqlx::query_as::<_, (String, String, String, String, String, i64)>(
        r#"
        SELECT g.id, g.name, g.invite_code, g.owner_id, gm.role, g.created_at
        FROM groups g
        JOIN group_members gm ON g.id = gm.group_id
        WHERE gm.user_id = $1
        ORDER BY g.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, name, invite_code, owner_id, role, created_at)| GroupWithRole {
                id,
                name,
                invite_code,
                owner_id,
                role,
                created_at,
            },
        )
        .collect())
}

fn row_to_group(row: (String, String, String, String, i64, i64)) -> GroupRow {
    let (id, name, invite_code, owner_id, created_at, updated_at) = row;
    GroupRow {
        id,
        name,
        invite_code,
        owner_id,
        created_at,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), INVITE_CODE_LEN);
        assert!(code.bytes().all(|b| INVITE_CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_invite_code_excludes_ambiguous_chars() {
        for _ in 0..100 {
            let code = generate_invite_code();
            assert!(!code.contains('0'));
            assert!(!code.contains('O'));
            assert!(!code.contains('1'));
            assert!(!code.contains('I'));
        }
    }
}
