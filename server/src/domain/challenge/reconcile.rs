//! Progress reconciler
//!
//! Persists the streak projection into the `challenge_progress` cache row.
//! The row is disposable: nothing here is authoritative except as input to
//! display and milestone gating, and every write is safe to re-run.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::milestones::{milestone_key, milestones_reached};
use super::streak::recompute_streak;
use crate::data::postgres::PostgresError;
use crate::data::postgres::repositories::{achievement, progress};
use crate::data::types::ProgressRow;

/// Ensure a progress row exists for (user, group), then reconcile it with the
/// completion log.
///
/// - A missing row is created with streak 0.
/// - A stored `start_date` that disagrees with the authoritative squad start
///   date (e.g. the owner's timezone was healed after the row was created) is
///   overwritten, which is how existing members catch up to a corrected
///   boundary.
/// - The recomputed `(streak, last_completed_date)` is persisted only when it
///   differs from the stored values.
/// - Milestone achievements are evaluated only on a genuine same-day streak
///   advance, never on plain reads, and never fail the caller.
///
/// A write failure here propagates: the triggering toggle is reported as
/// failed even though its completion-log write may have committed, and the
/// next successful pass repairs the visible state.
pub async fn ensure_and_reconcile_progress(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    start_date: NaiveDate,
    today: NaiveDate,
) -> Result<ProgressRow, PostgresError> {
    let mut record = progress::ensure_progress(pool, user_id, group_id, start_date).await?;

    if record.start_date != start_date {
        tracing::debug!(
            %user_id, %group_id,
            stored = %record.start_date, authoritative = %start_date,
            "Correcting stale progress start_date"
        );
        progress::update_start_date(pool, &record.id, start_date).await?;
        record.start_date = start_date;
    }

    let result = recompute_streak(pool, user_id, group_id, start_date, today).await?;

    let changed = result.streak != record.current_streak
        || result.last_completed_date != record.last_completed_date;
    if !changed {
        return Ok(record);
    }

    let advanced_today =
        result.streak > record.current_streak && result.last_completed_date == Some(today);

    progress::update_streak(pool, &record.id, result.streak, result.last_completed_date).await?;
    record.current_streak = result.streak;
    record.last_completed_date = result.last_completed_date;

    if advanced_today {
        award_streak_milestones(pool, user_id, result.streak).await;
    }

    Ok(record)
}

/// Award every milestone met by the streak. Best-effort: failures are logged
/// and swallowed so they can never fail the toggle that triggered them.
async fn award_streak_milestones(pool: &PgPool, user_id: &str, streak: u32) {
    for threshold in milestones_reached(streak) {
        let key = milestone_key(threshold);
        match achievement::award(pool, user_id, &key).await {
            Ok(true) => {
                tracing::info!(%user_id, achievement = %key, "Achievement earned");
            }
            Ok(false) => {} // already earned
            Err(e) => {
                tracing::warn!(%user_id, achievement = %key, error = %e, "Achievement award failed");
            }
        }
    }
}
