//! Bot server hosting the study session core.
//!
//! This crate provides two independent tick actors and the inbound surface:
//! - **RewardBot**: Grants XP to everyone studying, once per reward interval
//! - **PomodoroBot**: Flips pomodoro timers whose phase has run out
//! - **StudyService**: Entry points for chat platform commands

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod metrics;
mod pomodoro;
mod rewards;
mod server;
mod service;

pub use api::{ApiState, create_router};
pub use config::{
    ApiConfig, BotSchedule, DatabaseConfig, LeaderboardConfig, ScheduleConfig, StudyBotConfig,
};
pub use metrics::{BotMetrics, MetricsSnapshot, PomodoroMetricSnapshot, RewardMetricSnapshot};
pub use pomodoro::{PomodoroBot, PomodoroMessage};
pub use rewards::{RewardBot, RewardMessage};
pub use server::{StudyServer, StudyServerHandle};
pub use service::StudyService;
