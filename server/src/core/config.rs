use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_MAX_LIFETIME_SECS, POSTGRES_DEFAULT_MIN_CONNECTIONS,
    POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS, REPAIR_DEFAULT_LOOKBACK_DAYS,
    REPAIR_DEFAULT_MAX_ROWS,
};

/// Check whether a host string binds to all interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

// =============================================================================
// Server Config
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// =============================================================================
// PostgreSQL Config
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub statement_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: POSTGRES_DEFAULT_MAX_CONNECTIONS,
            min_connections: POSTGRES_DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
            max_lifetime_secs: POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
            statement_timeout_secs: POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Repair Config
// =============================================================================

/// Tuning for the historical completion-date repair utility
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RepairConfig {
    pub lookback_days: u32,
    pub max_rows: u32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            lookback_days: REPAIR_DEFAULT_LOOKBACK_DAYS,
            max_rows: REPAIR_DEFAULT_MAX_ROWS,
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub postgres: PostgresConfig,
    pub repair: RepairConfig,
}

impl AppConfig {
    /// Load configuration: defaults, then config file (if present), then CLI/env overrides
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let path = Self::resolve_config_path(cli.config.as_deref());

        let mut config = match &path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        if let Some(host) = &cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(url) = &cli.postgres_url {
            config.postgres.url = url.clone();
        }
        if let Some(days) = cli.repair_lookback_days {
            config.repair.lookback_days = days;
        }
        if let Some(rows) = cli.repair_max_rows {
            config.repair.max_rows = rows;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Explicit path wins; otherwise look for the config file in the working directory
    fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(p.to_path_buf());
        }

        let cwd = PathBuf::from(CONFIG_FILE_NAME);
        cwd.exists().then_some(cwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.repair.lookback_days, REPAIR_DEFAULT_LOOKBACK_DAYS);
        assert_eq!(config.repair.max_rows, REPAIR_DEFAULT_MAX_ROWS);
        assert!(config.postgres.url.is_empty());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"host": "0.0.0.0", "port": 9000}}, "postgres": {{"url": "postgres://file"}}}}"#
        )
        .unwrap();

        let cli = CliConfig {
            port: Some(9100),
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.postgres.url, "postgres://file");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"repair": {{"lookback_days": 10}}}}"#).unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.repair.lookback_days, 10);
        assert_eq!(config.repair.max_rows, REPAIR_DEFAULT_MAX_ROWS);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}
