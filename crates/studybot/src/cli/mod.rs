//! Command-line interface module.

mod commands;
mod query;
mod run;

pub use commands::{Cli, Commands};
pub use query::{show_leaderboard, show_stats};
pub use run::run_server;
