//! Squad timezone and start-date resolution
//!
//! A squad shares one day boundary or leaderboard and streak comparisons are
//! meaningless. The only reliable source for that boundary is the owner's
//! stored timezone, which older accounts may never have captured; the
//! resolver heals those lazily instead of via a migration script.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use sqlx::PgPool;

use super::dates::{local_date, parse_timezone};
use crate::core::constants::DEFAULT_TIMEZONE;
use crate::data::postgres::repositories::{group, settings};

/// Resolve the IANA timezone that defines a group's shared day boundary.
///
/// The owner's explicit non-default setting wins regardless of who asks.
/// When the owner has no usable setting and *is* the requester, the supplied
/// fallback is written through as their timezone (self-healing; idempotent,
/// so the unguarded read-then-write race only costs duplicate writes).
/// Members without a healed owner all agree on the owner's stored value,
/// even if that value is the UTC placeholder.
///
/// Never blocks the caller: every lookup failure degrades to the
/// request-supplied fallback.
pub async fn resolve_squad_timezone(
    pool: &PgPool,
    group_id: &str,
    fallback_tz: &str,
    requester_id: &str,
) -> String {
    let owner_id = match group::get_group(pool, group_id).await {
        Ok(Some(g)) => g.owner_id,
        Ok(None) => return fallback_tz.to_string(),
        Err(e) => {
            tracing::warn!(%group_id, error = %e, "Group lookup failed, using fallback timezone");
            return fallback_tz.to_string();
        }
    };

    let stored = match settings::get_settings(pool, &owner_id).await {
        Ok(s) => s.map(|s| s.timezone),
        Err(e) => {
            tracing::warn!(%group_id, error = %e, "Settings lookup failed, using fallback timezone");
            return fallback_tz.to_string();
        }
    };

    match decide_timezone(stored.as_deref(), fallback_tz, requester_id == owner_id) {
        TimezoneDecision::UseStored(tz) => tz,
        TimezoneDecision::Heal(tz) => {
            match settings::upsert_timezone(pool, &owner_id, &tz).await {
                Ok(_) => {
                    tracing::info!(%group_id, %owner_id, timezone = %tz, "Healed owner timezone");
                }
                Err(e) => {
                    tracing::warn!(%group_id, error = %e, "Timezone heal failed");
                }
            }
            tz
        }
        TimezoneDecision::Placeholder => DEFAULT_TIMEZONE.to_string(),
    }
}

/// What the resolver decided about a group's day boundary
#[derive(Debug, Clone, PartialEq, Eq)]
enum TimezoneDecision {
    /// The owner's stored value answers it, valid or placeholder alike
    UseStored(String),
    /// Write the value through as the owner's timezone, then use it
    Heal(String),
    /// No stored value and no heal possible
    Placeholder,
}

fn decide_timezone(
    stored: Option<&str>,
    fallback_tz: &str,
    requester_is_owner: bool,
) -> TimezoneDecision {
    // An explicit, valid, non-placeholder owner timezone is the answer
    if let Some(tz) = stored
        && tz != DEFAULT_TIMEZONE
        && parse_timezone(Some(tz)).is_some()
    {
        return TimezoneDecision::UseStored(tz.to_string());
    }

    // Owner setting absent or still the bootstrap placeholder: heal it from
    // the owner's own request
    if requester_is_owner
        && fallback_tz != DEFAULT_TIMEZONE
        && parse_timezone(Some(fallback_tz)).is_some()
    {
        return TimezoneDecision::Heal(fallback_tz.to_string());
    }

    // Keep all members on one boundary rather than each seeing their own
    match stored {
        Some(tz) => TimezoneDecision::UseStored(tz.to_string()),
        None => TimezoneDecision::Placeholder,
    }
}

/// Resolve the calendar date (in the squad timezone) on which the group's
/// challenge began: the group's creation instant localized once.
///
/// This is the epoch every member's day number is measured against. Existing
/// `challenge_progress` rows keep their stored start_date until the
/// reconciler's update-on-mismatch catches them up, so healing the timezone
/// for future lookups does not retroactively drift already-rendered history.
pub async fn resolve_squad_start_date(
    pool: &PgPool,
    group_id: &str,
    tz: Tz,
    fallback: NaiveDate,
) -> NaiveDate {
    match group::get_group(pool, group_id).await {
        Ok(Some(g)) => DateTime::from_timestamp(g.created_at, 0)
            .map(|instant| local_date(instant, tz))
            .unwrap_or(fallback),
        Ok(None) => fallback,
        Err(e) => {
            tracing::warn!(%group_id, error = %e, "Group lookup failed, using fallback start date");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_owner_timezone_wins_for_everyone() {
        for is_owner in [true, false] {
            assert_eq!(
                decide_timezone(Some("America/New_York"), "Europe/Berlin", is_owner),
                TimezoneDecision::UseStored("America/New_York".to_string())
            );
        }
    }

    #[test]
    fn owner_request_heals_missing_or_placeholder_setting() {
        assert_eq!(
            decide_timezone(None, "Asia/Tokyo", true),
            TimezoneDecision::Heal("Asia/Tokyo".to_string())
        );
        assert_eq!(
            decide_timezone(Some("UTC"), "Asia/Tokyo", true),
            TimezoneDecision::Heal("Asia/Tokyo".to_string())
        );
    }

    #[test]
    fn healing_is_idempotent() {
        // After the first heal the stored value is the supplied timezone, so
        // repeating the same request reads it back without another write
        assert_eq!(
            decide_timezone(Some("UTC"), "Asia/Tokyo", true),
            TimezoneDecision::Heal("Asia/Tokyo".to_string())
        );
        assert_eq!(
            decide_timezone(Some("Asia/Tokyo"), "Asia/Tokyo", true),
            TimezoneDecision::UseStored("Asia/Tokyo".to_string())
        );
    }

    #[test]
    fn members_never_heal_and_share_the_stored_placeholder() {
        assert_eq!(
            decide_timezone(Some("UTC"), "Asia/Tokyo", false),
            TimezoneDecision::UseStored("UTC".to_string())
        );
        assert_eq!(
            decide_timezone(None, "Asia/Tokyo", false),
            TimezoneDecision::Placeholder
        );
    }

    #[test]
    fn invalid_or_placeholder_request_value_never_heals() {
        assert_eq!(
            decide_timezone(None, "Not/A_Zone", true),
            TimezoneDecision::Placeholder
        );
        assert_eq!(
            decide_timezone(None, "UTC", true),
            TimezoneDecision::Placeholder
        );
    }
}
