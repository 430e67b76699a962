//! Read-only query command handlers.

use std::sync::Arc;
use studybot::{
    Notifier, SessionRegistry, SqliteStudyStore, StudyBotConfig, StudyBotResult, StudyService,
};

fn offline_service(config: &StudyBotConfig) -> StudyBotResult<StudyService> {
    let store = Arc::new(SqliteStudyStore::connect(
        &config.database.url,
        config.database.max_connections,
    )?);
    let registry = Arc::new(SessionRegistry::new(store, Notifier::disconnected()));
    Ok(StudyService::new(registry).with_default_leaderboard_limit(config.leaderboard.default_limit))
}

/// Handle the `stats` command
pub async fn show_stats(config: &StudyBotConfig, server_id: i64, user_id: i64) -> StudyBotResult<()> {
    let service = offline_service(config)?;
    match service.on_query_stats(user_id, server_id).await? {
        Some(stat) => {
            println!("User {} in server {}", stat.user_id, stat.server_id);
            println!("  level:         {}", stat.level);
            println!("  xp:            {}", stat.xp);
            println!("  study minutes: {}", stat.total_study_minutes);
            if let Some(last) = stat.last_session_time {
                println!("  last session:  {}", last.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        None => println!("No statistics for user {} in server {}", user_id, server_id),
    }
    Ok(())
}

/// Handle the `leaderboard` command
pub async fn show_leaderboard(
    config: &StudyBotConfig,
    server_id: i64,
    limit: Option<i64>,
) -> StudyBotResult<()> {
    let service = offline_service(config)?;
    let board = service.on_query_leaderboard(server_id, limit).await?;

    if board.is_empty() {
        println!("No one has studied in server {} yet", server_id);
        return Ok(());
    }

    println!("{:>4}  {:>20}  {:>5}  {:>6}  {:>8}", "#", "user", "level", "xp", "minutes");
    for (rank, entry) in board.iter().enumerate() {
        println!(
            "{:>4}  {:>20}  {:>5}  {:>6}  {:>8}",
            rank + 1,
            entry.user_id,
            entry.level,
            entry.xp,
            entry.total_study_minutes
        );
    }
    Ok(())
}
