//! studybot - study session bot core
//!
//! studybot tracks who is studying together in a chat server's study
//! channel, rewards them with XP while they stay, keeps per-server
//! leaderboards and drives optional pomodoro work/break timers. The chat
//! platform itself stays outside: it calls [`StudyService`] and renders the
//! [`StudyEvent`]s that come back.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use studybot::{Notifier, SessionRegistry, SqliteStudyStore, StudyService};
//!
//! # async fn example() -> studybot::StudyBotResult<()> {
//! let store = Arc::new(SqliteStudyStore::connect("studybot.db", 8)?);
//! let (notifier, _receivers) = Notifier::channel();
//! let registry = Arc::new(SessionRegistry::new(store, notifier));
//! let service = StudyService::new(registry);
//!
//! service.on_join_requested(1, 42, 7).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `studybot_error` - Error types
//! - `studybot_core` - Leveling math, pomodoro state machine, shared types
//! - `studybot_interface` - `StudyStore` trait and outbound events
//! - `studybot_database` - SQLite persistence
//! - `studybot_session` - Session registry, reward tick, pomodoro scan
//! - `studybot_bot` - Tick actors, inbound service, metrics API
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod drain;
pub mod observability;

pub use drain::LoggingEventDrain;

pub use studybot_error::{
    ConfigError, DatabaseError, DatabaseErrorKind, SessionError, SessionErrorKind, StudyBotError,
    StudyBotErrorKind, StudyBotResult,
};

pub use studybot_core::{
    ActiveSessionSnapshot, ChannelId, Clock, JoinOutcome, LeaderboardEntry, LeaveOutcome,
    LevelProgress, ManualClock, Phase, PhaseTransition, PomodoroSnapshot, PomodoroState, ServerId,
    SessionId, SystemClock, UserId, UserStat, XP_AWARD_RANGE, XpOutcome, apply_award, roll_award,
    studied_minutes, xp_to_next_level,
};

pub use studybot_interface::{EventReceivers, Notifier, StudyEvent, StudyStore, VoiceNotification};

pub use studybot_database::{SqlitePool, SqliteStudyStore, establish_pool};

pub use studybot_session::{PomodoroScanReport, RewardTickReport, SessionRegistry};

pub use studybot_bot::{
    ApiConfig, BotMetrics, BotSchedule, DatabaseConfig, LeaderboardConfig, MetricsSnapshot,
    ScheduleConfig, StudyBotConfig, StudyServer, StudyServerHandle, StudyService,
};
