//! PostgreSQL error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl PostgresError {
    /// Whether this error is a unique-constraint violation.
    ///
    /// Concurrent duplicate inserts (completion toggles, invite codes, repaired
    /// dates) are expected and handled structurally by callers, so they need to
    /// be distinguishable from real failures.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db)) => {
                // 23505 = unique_violation
                db.code().as_deref() == Some("23505")
            }
            Self::Conflict(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = PostgresError::MigrationFailed {
            version: 2,
            name: "add_custom_tasks".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_custom_tasks) failed: syntax error"
        );
    }

    #[test]
    fn test_conflict_is_unique_violation() {
        let err = PostgresError::Conflict("invite code taken".to_string());
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_config_error_is_not_unique_violation() {
        let err = PostgresError::Config("missing URL".to_string());
        assert!(!err.is_unique_violation());
    }
}
