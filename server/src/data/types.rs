//! Row types shared between repositories and API DTOs

use chrono::NaiveDate;

/// A user row
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-user settings. `timezone` is an IANA identifier; 'UTC' doubles as the
/// bootstrap placeholder for accounts created before timezone capture existed.
#[derive(Debug, Clone)]
pub struct UserSettingsRow {
    pub user_id: String,
    pub timezone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A squad row
#[derive(Debug, Clone)]
pub struct GroupRow {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A group a user belongs to, with their role
#[derive(Debug, Clone)]
pub struct GroupWithRole {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub owner_id: String,
    pub role: String,
    pub created_at: i64,
}

/// Group membership row
#[derive(Debug, Clone)]
pub struct MembershipRow {
    pub group_id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: i64,
}

/// A member of a group joined with user info
#[derive(Debug, Clone)]
pub struct MemberWithUser {
    pub user_id: String,
    pub display_name: Option<String>,
    pub role: String,
    pub joined_at: i64,
}

/// Derived per-(user, group) challenge state. A cache over `task_completions`,
/// never a source of truth; always regenerable by the streak engine.
#[derive(Debug, Clone)]
pub struct ProgressRow {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub start_date: NaiveDate,
    pub current_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A task completion fact: user completed `task_key` in a group on a squad-local
/// calendar date. `completed_at` is the wall-clock instant of the toggle.
#[derive(Debug, Clone)]
pub struct CompletionRow {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub task_key: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub completed_at: i64,
}

/// User-defined extra checklist item. Never counted toward streaks.
#[derive(Debug, Clone)]
pub struct CustomTaskRow {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub label: String,
    pub created_at: i64,
}

/// An earned achievement
#[derive(Debug, Clone)]
pub struct AchievementRow {
    pub user_id: String,
    pub achievement_key: String,
    pub earned_at: i64,
}
