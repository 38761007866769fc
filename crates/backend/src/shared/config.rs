use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Настройки подсистемы синхронизации
#[derive(Debug, Deserialize, Clone)]
pub struct SyncSettings {
    /// Интервал опроса очереди заданий, секунды
    #[serde(default = "default_worker_interval")]
    pub worker_interval_seconds: u64,

    /// Размер пачки заказов, если задание не задало свой
    #[serde(default = "default_batch_size")]
    pub default_batch_size: u32,

    /// Пауза после каждых N обработанных заказов
    #[serde(default = "default_throttle_every")]
    pub throttle_every: u32,

    /// Длительность паузы, миллисекунды
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Задержка постановки задания-продолжения, секунды
    #[serde(default = "default_continuation_delay")]
    pub continuation_delay_seconds: i64,

    /// Пол цепочки auto-синхронизации: пустое окно старше этого возраста
    /// (в днях) завершает цепочку
    #[serde(default = "default_chain_floor")]
    pub chain_floor_days: i64,
}

fn default_worker_interval() -> u64 {
    60
}

fn default_batch_size() -> u32 {
    200
}

fn default_throttle_every() -> u32 {
    25
}

fn default_throttle_ms() -> u64 {
    200
}

fn default_continuation_delay() -> i64 {
    30
}

fn default_chain_floor() -> i64 {
    730
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            worker_interval_seconds: default_worker_interval(),
            default_batch_size: default_batch_size(),
            throttle_every: default_throttle_every(),
            throttle_ms: default_throttle_ms(),
            continuation_delay_seconds: default_continuation_delay(),
            chain_floor_days: default_chain_floor(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[sync]
worker_interval_seconds = 60
default_batch_size = 200
throttle_every = 25
throttle_ms = 200
continuation_delay_seconds = 30
chain_floor_days = 730
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    // If absolute path, use as is
    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    // If relative path, resolve it relative to the executable directory
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.sync.default_batch_size, 200);
        assert_eq!(config.sync.chain_floor_days, 730);
    }

    #[test]
    fn test_sync_settings_default_when_section_missing() {
        let config: Config = toml::from_str("[database]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.sync.worker_interval_seconds, 60);
        assert_eq!(config.sync.continuation_delay_seconds, 30);
    }
}
