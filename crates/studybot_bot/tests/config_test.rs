//! Tests for configuration loading.

use std::time::Duration;
use studybot_bot::{BotSchedule, StudyBotConfig};
use tempfile::TempDir;

#[test]
fn test_empty_config_uses_defaults() {
    let config = StudyBotConfig::from_toml_str("").unwrap();
    assert_eq!(config, StudyBotConfig::default());
    assert_eq!(config.database.url, "studybot.db");
    assert_eq!(config.database.max_connections, 8);
    assert_eq!(config.leaderboard.default_limit, 10);
    assert!(config.api.is_none());

    let schedule = BotSchedule::from(&config);
    assert_eq!(schedule.reward_interval, Duration::from_secs(60));
    assert_eq!(schedule.pomodoro_scan_interval, Duration::from_secs(30));
}

#[test]
fn test_full_config_parses() {
    let config = StudyBotConfig::from_toml_str(
        r#"
        [database]
        url = ":memory:"
        max_connections = 1

        [schedule]
        reward_interval_secs = 90
        pomodoro_scan_interval_secs = 5

        [leaderboard]
        default_limit = 25

        [api]
        bind = "127.0.0.1:9090"
        "#,
    )
    .unwrap();

    assert_eq!(config.database.url, ":memory:");
    assert_eq!(config.schedule.reward_interval_secs, 90);
    assert_eq!(config.leaderboard.default_limit, 25);
    assert_eq!(config.api.unwrap().bind, "127.0.0.1:9090");
}

#[test]
fn test_zero_intervals_are_rejected() {
    for body in [
        "[schedule]\nreward_interval_secs = 0",
        "[schedule]\npomodoro_scan_interval_secs = 0",
        "[database]\nmax_connections = 0",
        "[leaderboard]\ndefault_limit = 0",
    ] {
        let err = StudyBotConfig::from_toml_str(body).unwrap_err();
        assert!(err.to_string().contains("must be positive"), "{}", err);
    }
}

#[test]
fn test_malformed_toml_is_config_error() {
    let err = StudyBotConfig::from_toml_str("[schedule\nreward").unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn test_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("studybot.toml");
    std::fs::write(&path, "[schedule]\nreward_interval_secs = 15\n").unwrap();

    let config = StudyBotConfig::from_file(&path).unwrap();
    assert_eq!(config.schedule.reward_interval_secs, 15);

    let missing = StudyBotConfig::from_file(temp_dir.path().join("missing.toml")).unwrap_err();
    assert!(missing.to_string().contains("Failed to read config file"));
}
