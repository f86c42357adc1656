//! Streak recomputation engine
//!
//! Streaks are always recomputed from scratch over the completion log, never
//! maintained incrementally: completions can be untoggled, backfilled by the
//! repair utility, or shifted by timezone healing, and any of those would
//! drift a counter. The scan is bounded by `min(today - start, 75)` days.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sqlx::PgPool;

use super::dates::add_days;
use crate::core::constants::{CHALLENGE_LENGTH_DAYS, REQUIRED_TASK_KEYS};
use crate::data::postgres::PostgresError;
use crate::data::postgres::repositories::completion;
use crate::data::types::{CompletionRow, ProgressRow};

/// Result of a streak recomputation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakResult {
    pub streak: u32,
    pub last_completed_date: Option<NaiveDate>,
}

/// Project completion rows into the set of fully-completed dates.
///
/// A date counts iff the *set* of distinct required task keys completed on it
/// covers every required task; using a set means duplicate rows (which the
/// uniqueness constraint should prevent anyway) cannot inflate the count, and
/// custom/unknown task keys never contribute.
pub fn fully_completed_dates(rows: &[CompletionRow]) -> HashSet<NaiveDate> {
    let mut by_date: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();

    for row in rows {
        if REQUIRED_TASK_KEYS.contains(&row.task_key.as_str()) {
            by_date.entry(row.date).or_default().insert(&row.task_key);
        }
    }

    by_date
        .into_iter()
        .filter(|(_, keys)| keys.len() >= REQUIRED_TASK_KEYS.len())
        .map(|(date, _)| date)
        .collect()
}

/// Walk backward from the most recent fully-completed date, counting
/// consecutive days until the first gap or the challenge-length cap
fn walk_streak(completed: &HashSet<NaiveDate>) -> StreakResult {
    let Some(&last) = completed.iter().max() else {
        return StreakResult {
            streak: 0,
            last_completed_date: None,
        };
    };

    let mut streak = 0u32;
    let mut day = last;
    while completed.contains(&day) && streak < CHALLENGE_LENGTH_DAYS {
        streak += 1;
        day = add_days(day, -1);
    }

    StreakResult {
        streak,
        last_completed_date: Some(last),
    }
}

/// Recompute `(streak, last_completed_date)` from the raw completion log.
/// Pure projection: reads only, no mutation.
pub async fn recompute_streak(
    pool: &PgPool,
    user_id: &str,
    group_id: &str,
    start_date: NaiveDate,
    today: NaiveDate,
) -> Result<StreakResult, PostgresError> {
    let rows = completion::list_in_range(
        pool,
        user_id,
        group_id,
        &REQUIRED_TASK_KEYS,
        start_date,
        today,
    )
    .await?;

    Ok(walk_streak(&fully_completed_dates(&rows)))
}

/// The streak as displayed: live only while the last fully-completed date is
/// today or yesterday in squad-local time, otherwise presented as 0.
///
/// Staleness is detected lazily on read; no scheduled job zeroes out stored
/// streaks, and the stored integer is corrected by the next recomputation.
pub fn active_streak(progress: &ProgressRow, today: NaiveDate) -> u32 {
    match progress.last_completed_date {
        Some(last) if last == today || last == add_days(today, -1) => progress.current_streak,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn completion(task_key: &str, d: NaiveDate) -> CompletionRow {
        CompletionRow {
            id: cuid2::create_id(),
            user_id: "user_1".to_string(),
            group_id: "group_1".to_string(),
            task_key: task_key.to_string(),
            date: d,
            note: None,
            completed_at: 0,
        }
    }

    /// All required tasks completed on each of the given dates
    fn full_days(dates: &[NaiveDate]) -> Vec<CompletionRow> {
        dates
            .iter()
            .flat_map(|d| REQUIRED_TASK_KEYS.iter().map(|k| completion(k, *d)))
            .collect()
    }

    fn progress(streak: u32, last: Option<NaiveDate>) -> ProgressRow {
        ProgressRow {
            id: "prog_1".to_string(),
            user_id: "user_1".to_string(),
            group_id: "group_1".to_string(),
            start_date: date(2024, 1, 1),
            current_streak: streak,
            last_completed_date: last,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_fully_completed_requires_every_task() {
        let d = date(2024, 2, 1);
        let mut rows = full_days(&[d]);
        assert_eq!(fully_completed_dates(&rows).len(), 1);

        // Missing one required task: not fully completed
        rows.pop();
        assert!(fully_completed_dates(&rows).is_empty());
    }

    #[test]
    fn test_duplicate_rows_cannot_inflate() {
        let d = date(2024, 2, 1);
        // Four distinct tasks, one of them duplicated to reach five rows
        let mut rows: Vec<_> = REQUIRED_TASK_KEYS[..4]
            .iter()
            .map(|k| completion(k, d))
            .collect();
        rows.push(completion(REQUIRED_TASK_KEYS[0], d));
        assert!(fully_completed_dates(&rows).is_empty());
    }

    #[test]
    fn test_custom_tasks_do_not_count() {
        let d = date(2024, 2, 1);
        let mut rows = full_days(&[d]);
        rows.retain(|r| r.task_key != "reading");
        rows.push(completion("my_custom_task", d));
        assert!(fully_completed_dates(&rows).is_empty());
    }

    #[test]
    fn test_three_consecutive_days() {
        // Completions on Feb 1-3, nothing on Jan 31, today = Feb 3
        let rows = full_days(&[date(2024, 2, 1), date(2024, 2, 2), date(2024, 2, 3)]);
        let result = walk_streak(&fully_completed_dates(&rows));
        assert_eq!(result.streak, 3);
        assert_eq!(result.last_completed_date, Some(date(2024, 2, 3)));
    }

    #[test]
    fn test_gap_stops_the_walk() {
        let rows = full_days(&[date(2024, 2, 1), date(2024, 2, 3), date(2024, 2, 4)]);
        let result = walk_streak(&fully_completed_dates(&rows));
        assert_eq!(result.streak, 2);
        assert_eq!(result.last_completed_date, Some(date(2024, 2, 4)));
    }

    #[test]
    fn test_empty_log() {
        let result = walk_streak(&HashSet::new());
        assert_eq!(result.streak, 0);
        assert_eq!(result.last_completed_date, None);
    }

    #[test]
    fn test_streak_caps_at_challenge_length() {
        let start = date(2024, 1, 1);
        let dates: Vec<_> = (0..100).map(|i| add_days(start, i)).collect();
        let result = walk_streak(&fully_completed_dates(&full_days(&dates)));
        assert_eq!(result.streak, CHALLENGE_LENGTH_DAYS);
    }

    #[test]
    fn test_append_grows_streak_by_contiguous_run() {
        // 2 + [gap] + 1: filling the gap joins the runs
        let mut dates = vec![date(2024, 2, 1), date(2024, 2, 2), date(2024, 2, 4)];
        let before = walk_streak(&fully_completed_dates(&full_days(&dates)));
        assert_eq!(before.streak, 1);

        dates.push(date(2024, 2, 3));
        let after = walk_streak(&fully_completed_dates(&full_days(&dates)));
        assert_eq!(after.streak, 4);
    }

    #[test]
    fn test_non_contiguous_append_leaves_streak_unchanged() {
        let mut dates = vec![date(2024, 2, 4), date(2024, 2, 5)];
        let before = walk_streak(&fully_completed_dates(&full_days(&dates)));

        dates.push(date(2024, 1, 20));
        let after = walk_streak(&fully_completed_dates(&full_days(&dates)));
        assert_eq!(before.streak, after.streak);
        assert_eq!(before.last_completed_date, after.last_completed_date);
    }

    #[test]
    fn test_active_streak_today_and_yesterday() {
        let today = date(2024, 2, 3);
        assert_eq!(active_streak(&progress(3, Some(today)), today), 3);
        assert_eq!(active_streak(&progress(3, Some(date(2024, 2, 2))), today), 3);
    }

    #[test]
    fn test_active_streak_stale_is_zero() {
        // Last completion two days ago: suppressed to 0 even though the
        // stored value is still 3
        let today = date(2024, 2, 5);
        let p = progress(3, Some(date(2024, 2, 3)));
        assert_eq!(p.current_streak, 3);
        assert_eq!(active_streak(&p, today), 0);
    }

    #[test]
    fn test_active_streak_never_completed() {
        assert_eq!(active_streak(&progress(0, None), date(2024, 2, 5)), 0);
    }
}
