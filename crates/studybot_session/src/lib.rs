//! Study session registry for studybot.
//!
//! [`SessionRegistry`] is the single source of truth for who is studying in
//! which server right now. It serialises join and leave requests per server,
//! hands out frozen snapshots for status queries, and drives the two periodic
//! jobs:
//!
//! - [`SessionRegistry::reward_tick`] grants XP to every participant
//! - [`SessionRegistry::pomodoro_scan`] flips expired pomodoro phases

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod active;
mod pomodoro;
mod registry;
mod report;
mod rewards;

pub use registry::SessionRegistry;
pub use report::{PomodoroScanReport, RewardTickReport};
