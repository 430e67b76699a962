//! Summaries of periodic jobs.

use serde::Serialize;

/// What one reward tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewardTickReport {
    /// Sessions visited
    pub sessions: usize,
    /// Participants that received XP
    pub awarded: usize,
    /// Awards that crossed a level threshold
    pub level_ups: usize,
    /// Snapshotted participants that left before their award
    pub skipped: usize,
    /// Awards that failed in storage
    pub failures: usize,
}

/// What one pomodoro scan did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PomodoroScanReport {
    /// Running timers inspected
    pub timers: usize,
    /// Phase flips performed
    pub transitions: usize,
}
