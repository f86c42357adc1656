//! Squad-day boundary and streak computation engine
//!
//! Everything day- or streak-shaped in the API goes through this module;
//! route handlers never reimplement any of it. The pipeline:
//!
//! 1. [`resolve_squad_timezone`] picks the single IANA timezone that defines
//!    the group's shared day boundary (the owner's setting, lazily healed).
//! 2. [`local_date`] converts an instant to a calendar date exactly once;
//!    all further arithmetic is pure calendar math ([`add_days`],
//!    [`diff_days`], [`day_number`]).
//! 3. [`resolve_squad_start_date`] anchors the challenge epoch.
//! 4. [`recompute_streak`] projects the completion log into a streak; it is
//!    the only streak computation, always from scratch, so toggles, repairs
//!    and timezone healing can never drift an incremental counter.
//! 5. [`ensure_and_reconcile_progress`] persists the projection into the
//!    `challenge_progress` cache row and awards milestones.
//! 6. [`active_streak`] is the lazily-zeroed live view.
//! 7. [`repair_group_completion_dates`] heals historically miscomputed dates.

mod dates;
mod milestones;
mod reconcile;
mod repair;
mod squad;
mod streak;

pub use dates::{DayFloor, add_days, day_number, diff_days, local_date, parse_timezone};
pub use milestones::{milestone_key, milestones_reached};
pub use reconcile::ensure_and_reconcile_progress;
pub use repair::{RepairOptions, RepairSummary, repair_group_completion_dates};
pub use squad::{resolve_squad_start_date, resolve_squad_timezone};
pub use streak::{StreakResult, active_streak, fully_completed_dates, recompute_streak};
