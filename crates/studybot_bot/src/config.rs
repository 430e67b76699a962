use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use studybot_error::{ConfigError, StudyBotError, StudyBotResult};

/// Configuration for the study bot host.
///
/// Every section and field has a default, so an empty file is valid.
///
/// # Example
/// ```
/// use studybot_bot::StudyBotConfig;
///
/// let config = StudyBotConfig::from_toml_str(
///     r#"
///     [schedule]
///     reward_interval_secs = 120
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.schedule.reward_interval_secs, 120);
/// assert_eq!(config.schedule.pomodoro_scan_interval_secs, 30);
/// assert!(config.api.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyBotConfig {
    /// Storage settings
    pub database: DatabaseConfig,
    /// Tick intervals
    pub schedule: ScheduleConfig,
    /// Leaderboard query settings
    pub leaderboard: LeaderboardConfig,
    /// Metrics HTTP endpoint; omitted means no endpoint
    pub api: Option<ApiConfig>,
}

impl StudyBotConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> StudyBotResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StudyBotError::from(ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> StudyBotResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            StudyBotError::from(ConfigError::new(format!("Failed to parse config: {}", e)))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> StudyBotResult<()> {
        if self.schedule.reward_interval_secs == 0 {
            return Err(ConfigError::new("schedule.reward_interval_secs must be positive").into());
        }
        if self.schedule.pomodoro_scan_interval_secs == 0 {
            return Err(
                ConfigError::new("schedule.pomodoro_scan_interval_secs must be positive").into(),
            );
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::new("database.max_connections must be positive").into());
        }
        if self.leaderboard.default_limit <= 0 {
            return Err(ConfigError::new("leaderboard.default_limit must be positive").into());
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::new("database.url must not be empty").into());
        }
        Ok(())
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path, or `:memory:`
    pub url: String,
    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "studybot.db".to_string(),
            max_connections: 8,
        }
    }
}

/// Tick intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between XP reward ticks
    pub reward_interval_secs: u64,
    /// Seconds between pomodoro scans
    pub pomodoro_scan_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            reward_interval_secs: 60,
            pomodoro_scan_interval_secs: 30,
        }
    }
}

/// Leaderboard query settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Entries returned when a query names no limit
    pub default_limit: i64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// Metrics HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Socket address to listen on, e.g. `127.0.0.1:9090`
    pub bind: String,
}

/// Tick scheduling derived from [`StudyBotConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotSchedule {
    /// Reward tick interval
    pub reward_interval: Duration,
    /// Pomodoro scan interval
    pub pomodoro_scan_interval: Duration,
}

impl From<&StudyBotConfig> for BotSchedule {
    fn from(config: &StudyBotConfig) -> Self {
        Self {
            reward_interval: Duration::from_secs(config.schedule.reward_interval_secs),
            pomodoro_scan_interval: Duration::from_secs(
                config.schedule.pomodoro_scan_interval_secs,
            ),
        }
    }
}
