//! studybot CLI binary.
//!
//! This binary hosts the study session core without a chat platform:
//! - Run the reward and pomodoro tickers, logging every outbound event
//! - Inspect statistics and leaderboards in the study database

use clap::Parser;
use studybot::StudyBotConfig;
use studybot::observability::{ObservabilityConfig, init_observability_with_config};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_server, show_leaderboard, show_stats};

    // Parse command-line arguments
    let cli = Cli::parse();

    let export_spans = matches!(cli.command, Commands::Run { export_spans: true });
    let mut observability = ObservabilityConfig::default()
        .with_json_logs(cli.json_logs)
        .with_span_export(export_spans);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    let guard = init_observability_with_config(observability)?;

    let config = StudyBotConfig::from_file(&cli.config)?;

    // Execute the requested command
    let result = match cli.command {
        Commands::Run { .. } => run_server(config).await,
        Commands::Stats { server, user } => show_stats(&config, server, user).await,
        Commands::Leaderboard { server, limit } => show_leaderboard(&config, server, limit).await,
    };

    guard.shutdown();
    result?;
    Ok(())
}
