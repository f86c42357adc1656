// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Hard75";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "hard75";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "hard75.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "HARD75_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "HARD75_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "HARD75_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "HARD75_LOG";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for the PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "HARD75_POSTGRES_URL";

// =============================================================================
// Environment Variables - Repair Utility
// =============================================================================

/// Environment variable for repair lookback window in days
pub const ENV_REPAIR_LOOKBACK_DAYS: &str = "HARD75_REPAIR_LOOKBACK_DAYS";

/// Environment variable for repair row cap per run
pub const ENV_REPAIR_MAX_ROWS: &str = "HARD75_REPAIR_MAX_ROWS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5775;

/// Default request body limit in bytes
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// PostgreSQL Defaults
// =============================================================================

pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Challenge Rules
// =============================================================================

/// Total length of the challenge in days
pub const CHALLENGE_LENGTH_DAYS: u32 = 75;

/// Task keys that must all be completed on a date for it to count toward a
/// streak. Custom tasks are never part of this set.
pub const REQUIRED_TASK_KEYS: [&str; 5] = ["workout_1", "workout_2", "diet", "water", "reading"];

/// Streak lengths that earn an achievement
pub const STREAK_MILESTONES: [u32; 5] = [7, 14, 30, 50, 75];

/// Bootstrap placeholder timezone for accounts created before capture existed
pub const DEFAULT_TIMEZONE: &str = "UTC";

// =============================================================================
// Groups
// =============================================================================

pub const GROUP_ROLE_ADMIN: &str = "admin";
pub const GROUP_ROLE_MEMBER: &str = "member";

/// Length of generated invite codes
pub const INVITE_CODE_LEN: usize = 8;

/// Attempts to regenerate an invite code after a uniqueness collision
pub const INVITE_CODE_MAX_RETRIES: u32 = 5;

// =============================================================================
// Repair Utility Defaults
// =============================================================================

/// How far back (in days, by completion instant) a repair pass scans
pub const REPAIR_DEFAULT_LOOKBACK_DAYS: u32 = 4;

/// Maximum completion rows a single repair pass will examine
pub const REPAIR_DEFAULT_MAX_ROWS: u32 = 1200;
