//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// studybot - study sessions, XP leveling and pomodoro timers for chat servers
#[derive(Parser, Debug)]
#[command(name = "studybot")]
#[command(about = "Study session bot core with XP leveling and pomodoro timers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration TOML file
    #[arg(long, global = true, default_value = "studybot.toml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reward and pomodoro tickers until Ctrl+C
    Run {
        /// Export tracing spans to stdout
        #[arg(long)]
        export_spans: bool,
    },

    /// Print one user's statistics in a server
    Stats {
        /// Server id
        #[arg(long)]
        server: i64,

        /// User id
        #[arg(long)]
        user: i64,
    },

    /// Print a server's leaderboard
    Leaderboard {
        /// Server id
        #[arg(long)]
        server: i64,

        /// Maximum number of entries (defaults to the configured limit)
        #[arg(long)]
        limit: Option<i64>,
    },
}
