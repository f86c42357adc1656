//! PostgreSQL schema definitions

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL for PostgreSQL.
///
/// Calendar dates are stored as TEXT 'YYYY-MM-DD', already localized to the
/// squad timezone. Instants are epoch-seconds BIGINT.
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at BIGINT NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success BOOLEAN NOT NULL DEFAULT TRUE
);

-- =============================================================================
-- 1. Users
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE CHECK(email IS NULL OR length(email) >= 3),
    display_name TEXT CHECK(display_name IS NULL OR length(display_name) <= 100),
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
);

-- =============================================================================
-- 2. User Settings (references users)
-- =============================================================================
CREATE TABLE IF NOT EXISTS user_settings (
    user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    timezone TEXT NOT NULL DEFAULT 'UTC',
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
);

-- =============================================================================
-- 3. Groups (squads)
-- =============================================================================
CREATE TABLE IF NOT EXISTS groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 100),
    invite_code TEXT NOT NULL UNIQUE,
    owner_id TEXT NOT NULL REFERENCES users(id),
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_groups_invite_code ON groups(invite_code);

-- =============================================================================
-- 4. Group Members (references groups + users)
-- =============================================================================
CREATE TABLE IF NOT EXISTS group_members (
    group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role TEXT NOT NULL DEFAULT 'member' CHECK(role IN ('admin', 'member')),
    created_at BIGINT NOT NULL,
    PRIMARY KEY (group_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_group_members_user ON group_members(user_id);

-- =============================================================================
-- 5. Challenge Progress (derived cache, one row per user+group)
-- =============================================================================
CREATE TABLE IF NOT EXISTS challenge_progress (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    start_date TEXT NOT NULL,
    current_streak INTEGER NOT NULL DEFAULT 0 CHECK(current_streak >= 0),
    last_completed_date TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL,
    UNIQUE (user_id, group_id)
);

-- =============================================================================
-- 6. Task Completions (source of truth for streaks)
-- =============================================================================
CREATE TABLE IF NOT EXISTS task_completions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    task_key TEXT NOT NULL,
    date TEXT NOT NULL,
    note TEXT,
    completed_at BIGINT NOT NULL,
    UNIQUE (user_id, group_id, task_key, date)
);

CREATE INDEX IF NOT EXISTS idx_completions_user_group_date
    ON task_completions(user_id, group_id, date);
CREATE INDEX IF NOT EXISTS idx_completions_group_completed_at
    ON task_completions(group_id, completed_at);

-- =============================================================================
-- 7. Custom Tasks (user-defined extras, not counted toward streaks)
-- =============================================================================
CREATE TABLE IF NOT EXISTS custom_tasks (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    label TEXT NOT NULL CHECK(length(label) >= 1 AND length(label) <= 100),
    created_at BIGINT NOT NULL,
    UNIQUE (user_id, group_id, label)
);

-- =============================================================================
-- 8. User Achievements (upsert keyed on user + achievement)
-- =============================================================================
CREATE TABLE IF NOT EXISTS user_achievements (
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    achievement_key TEXT NOT NULL,
    earned_at BIGINT NOT NULL,
    PRIMARY KEY (user_id, achievement_key)
);
"#;
