//! Server command handler.

use std::sync::Arc;
use std::time::Duration;
use studybot::{
    BotMetrics, LoggingEventDrain, Notifier, SessionRegistry, SqliteStudyStore, StudyBotConfig,
    StudyBotResult, StudyServer,
};

const DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Handle the `run` command
pub async fn run_server(config: StudyBotConfig) -> StudyBotResult<()> {
    tracing::info!(database = %config.database.url, "Opening study database");
    let store = Arc::new(SqliteStudyStore::connect(
        &config.database.url,
        config.database.max_connections,
    )?);

    let (notifier, receivers) = Notifier::channel();
    let drain = LoggingEventDrain::new(receivers).spawn();
    let registry = Arc::new(SessionRegistry::new(store, notifier));

    let handle = StudyServer::start(&config, registry, BotMetrics::new()).await?;
    tracing::info!("Study server running. Press Ctrl+C to stop.");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down");
    }

    handle.shutdown().await;
    // Open API connections can keep the registry, and so the senders, alive
    match tokio::time::timeout(DRAIN_GRACE, drain).await {
        Ok(Ok(seen)) => tracing::info!(events = seen, "Event drain finished"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Event drain task failed"),
        Err(_) => tracing::warn!("Event drain still open, exiting anyway"),
    }
    Ok(())
}
