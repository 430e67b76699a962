//! Core data types for studybot.
//!
//! This crate holds everything that can be computed without touching storage
//! or the chat platform:
//!
//! - [`UserStat`], [`LeaderboardEntry`] and the session outcome types
//! - the XP/leveling rule in [`leveling`]
//! - the pomodoro work/break state machine in [`pomodoro`]
//! - the [`Clock`] used to read wall-clock time

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
pub mod leveling;
pub mod pomodoro;
mod session;
mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use leveling::{LevelProgress, XP_AWARD_RANGE, apply_award, roll_award, xp_to_next_level};
pub use pomodoro::{Phase, PhaseTransition, PomodoroSnapshot, PomodoroState};
pub use session::{ActiveSessionSnapshot, JoinOutcome, LeaveOutcome, studied_minutes};
pub use stats::{LeaderboardEntry, UserStat, XpOutcome};

/// Chat-platform user identifier.
pub type UserId = i64;
/// Chat-platform server (guild) identifier.
pub type ServerId = i64;
/// Chat-platform channel identifier.
pub type ChannelId = i64;
/// Persisted study session identifier.
pub type SessionId = i64;
