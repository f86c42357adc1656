//! Historical completion-date repair
//!
//! Completions written before the squad timezone was healed may carry a
//! stored date computed against the wrong boundary. This utility re-derives
//! each recent row's date from its `completed_at` instant and the (now
//! correct) squad timezone, and rewrites the rows that disagree. It runs
//! opportunistically from the status view and is best-effort throughout: a
//! failed row is logged and skipped, never propagated.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::PgPool;

use super::dates::local_date;
use crate::core::constants::{REPAIR_DEFAULT_LOOKBACK_DAYS, REPAIR_DEFAULT_MAX_ROWS};
use crate::data::postgres::repositories::completion;
use crate::data::types::CompletionRow;

/// Bounds on how much history a repair pass scans
#[derive(Debug, Clone, Copy)]
pub struct RepairOptions {
    pub lookback_days: u32,
    pub max_rows: u32,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            lookback_days: REPAIR_DEFAULT_LOOKBACK_DAYS,
            max_rows: REPAIR_DEFAULT_MAX_ROWS,
        }
    }
}

/// Counters from a repair pass, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub scanned: u32,
    pub attempted: u32,
    pub updated: u32,
    pub deleted_duplicates: u32,
}

/// The date a completion *should* carry: its recorded instant localized to
/// the squad timezone
fn corrected_date(completed_at: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(completed_at, 0).map(|instant| local_date(instant, tz))
}

/// Whether a row needs its stored date rewritten, and to what
fn repair_target(row: &CompletionRow, tz: Tz) -> Option<NaiveDate> {
    match corrected_date(row.completed_at, tz) {
        Some(corrected) if corrected != row.date => Some(corrected),
        _ => None,
    }
}

/// Rewrite recent completion rows whose stored date disagrees with their
/// instant localized to `tz`.
///
/// Collision policy: when a row already exists at the corrected (user, group,
/// task, date) slot, the misdated row is deleted rather than moved, so the
/// uniqueness invariant holds. The deleted row's note is lost; the surviving
/// row was entered against the correct date and wins.
///
/// Concurrent passes are safe: updates and deletes are idempotent, a
/// unique-violation on update means another pass (or the user) already filled
/// the corrected slot, and `rows_affected == 0` means the row vanished
/// underneath us. Both degrade to the delete/no-op path.
pub async fn repair_group_completion_dates(
    pool: &PgPool,
    group_id: &str,
    tz: Tz,
    options: RepairOptions,
) -> RepairSummary {
    let mut summary = RepairSummary::default();

    let cutoff = Utc::now().timestamp() - i64::from(options.lookback_days) * 86_400;
    let rows = match completion::list_recent_for_group(pool, group_id, cutoff, options.max_rows)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(%group_id, error = %e, "Repair scan failed");
            return summary;
        }
    };
    summary.scanned = rows.len() as u32;

    for row in rows {
        let Some(corrected) = repair_target(&row, tz) else {
            continue;
        };
        summary.attempted += 1;

        tracing::debug!(
            completion_id = %row.id, stored = %row.date, corrected = %corrected,
            "Repairing misdated completion"
        );

        let occupied = match completion::exists(
            pool,
            &row.user_id,
            &row.group_id,
            &row.task_key,
            corrected,
        )
        .await
        {
            Ok(occupied) => occupied,
            Err(e) => {
                tracing::warn!(completion_id = %row.id, error = %e, "Repair probe failed");
                continue;
            }
        };

        if occupied {
            match completion::delete_by_id(pool, &row.id).await {
                Ok(true) => summary.deleted_duplicates += 1,
                Ok(false) => {} // already gone
                Err(e) => {
                    tracing::warn!(completion_id = %row.id, error = %e, "Repair delete failed");
                }
            }
            continue;
        }

        match completion::update_date(pool, &row.id, corrected).await {
            Ok(0) => {} // row vanished between scan and update
            Ok(_) => summary.updated += 1,
            Err(e) if e.is_unique_violation() => {
                // Lost the race for the corrected slot; fall back to delete
                match completion::delete_by_id(pool, &row.id).await {
                    Ok(true) => summary.deleted_duplicates += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(completion_id = %row.id, error = %e, "Repair delete failed");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(completion_id = %row.id, error = %e, "Repair update failed");
            }
        }
    }

    if summary.attempted > 0 {
        tracing::info!(
            %group_id,
            scanned = summary.scanned,
            attempted = summary.attempted,
            updated = summary.updated,
            deleted = summary.deleted_duplicates,
            "Completion date repair pass finished"
        );
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(stored: NaiveDate, completed_at: i64) -> CompletionRow {
        CompletionRow {
            id: "comp_1".to_string(),
            user_id: "user_1".to_string(),
            group_id: "group_1".to_string(),
            task_key: "workout_1".to_string(),
            date: stored,
            note: None,
            completed_at,
        }
    }

    #[test]
    fn test_corrected_date_localizes_the_instant() {
        // 03:30 UTC on Jan 15 belongs to Jan 14 in New York
        let at = Utc
            .with_ymd_and_hms(2024, 1, 15, 3, 30, 0)
            .unwrap()
            .timestamp();
        assert_eq!(
            corrected_date(at, chrono_tz::America::New_York),
            Some(date(2024, 1, 14))
        );
        assert_eq!(corrected_date(at, chrono_tz::UTC), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_repair_target_flags_only_mismatches() {
        let at = Utc
            .with_ymd_and_hms(2024, 1, 15, 3, 30, 0)
            .unwrap()
            .timestamp();

        // Stored against the UTC boundary, squad is in New York: misdated
        let misdated = row(date(2024, 1, 15), at);
        assert_eq!(
            repair_target(&misdated, chrono_tz::America::New_York),
            Some(date(2024, 1, 14))
        );

        // Already correct: left alone
        let correct = row(date(2024, 1, 14), at);
        assert_eq!(repair_target(&correct, chrono_tz::America::New_York), None);
    }

    #[test]
    fn test_default_options() {
        let opts = RepairOptions::default();
        assert_eq!(opts.lookback_days, REPAIR_DEFAULT_LOOKBACK_DAYS);
        assert_eq!(opts.max_rows, REPAIR_DEFAULT_MAX_ROWS);
    }
}
