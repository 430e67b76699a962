//! Pomodoro work/break state machine.
//!
//! A timer starts in [`Phase::Work`] and flips whenever a scan observes that
//! the current phase has run out. Starting a break increments the cycle
//! count. Stopping a timer is terminal: a stopped timer never flips again.

use crate::ChannelId;
use chrono::{DateTime, Duration, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use studybot_error::SessionError;

/// Phase of a pomodoro timer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Focused study time
    #[display("work")]
    Work,
    /// Rest between work phases
    #[display("break")]
    Break,
}

/// Emitted when a timer moves to a new phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Phase the timer moved into
    pub new_phase: Phase,
    /// Work phases completed so far
    pub cycle_count: u32,
    /// Start of the new phase
    pub phase_start: DateTime<Utc>,
    /// Scheduled end of the new phase
    pub phase_end: DateTime<Utc>,
}

/// Read-only view of a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSnapshot {
    /// Whether the timer is running
    pub enabled: bool,
    /// Length of a work phase
    pub work_minutes: u32,
    /// Length of a break phase
    pub break_minutes: u32,
    /// Phase in progress
    pub current_phase: Phase,
    /// When the current phase began
    pub phase_start: DateTime<Utc>,
    /// When the current phase is due to end
    pub phase_end: DateTime<Utc>,
    /// Voice channel that receives phase cues
    pub voice_channel_id: Option<ChannelId>,
    /// Work phases completed so far
    pub cycle_count: u32,
}

/// Pomodoro timer attached to one active session.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PomodoroState {
    enabled: bool,
    work_minutes: u32,
    break_minutes: u32,
    current_phase: Phase,
    phase_start: DateTime<Utc>,
    phase_end: DateTime<Utc>,
    voice_channel_id: Option<ChannelId>,
    cycle_count: u32,
}

impl PomodoroState {
    /// Accepted work phase lengths, in minutes.
    pub const WORK_MINUTES: RangeInclusive<u32> = 1..=120;
    /// Accepted break phase lengths, in minutes.
    pub const BREAK_MINUTES: RangeInclusive<u32> = 1..=60;

    /// Starts a timer in the work phase at `now`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either length is outside its accepted range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use studybot_core::{Phase, PomodoroState};
    ///
    /// let timer = PomodoroState::configure(Utc::now(), 25, 5, None).unwrap();
    /// assert_eq!(*timer.current_phase(), Phase::Work);
    /// assert_eq!(*timer.cycle_count(), 1);
    ///
    /// assert!(PomodoroState::configure(Utc::now(), 0, 5, None).is_err());
    /// ```
    pub fn configure(
        now: DateTime<Utc>,
        work_minutes: u32,
        break_minutes: u32,
        voice_channel_id: Option<ChannelId>,
    ) -> Result<Self, SessionError> {
        Self::validate(work_minutes, break_minutes)?;

        Ok(Self {
            enabled: true,
            work_minutes,
            break_minutes,
            current_phase: Phase::Work,
            phase_start: now,
            phase_end: now + minutes(work_minutes),
            voice_channel_id,
            cycle_count: 1,
        })
    }

    /// Checks phase lengths without building a timer.
    pub fn validate(work_minutes: u32, break_minutes: u32) -> Result<(), SessionError> {
        if !Self::WORK_MINUTES.contains(&work_minutes) {
            return Err(SessionError::invalid_argument(format!(
                "work minutes must be between {} and {}, got {}",
                Self::WORK_MINUTES.start(),
                Self::WORK_MINUTES.end(),
                work_minutes
            )));
        }
        if !Self::BREAK_MINUTES.contains(&break_minutes) {
            return Err(SessionError::invalid_argument(format!(
                "break minutes must be between {} and {}, got {}",
                Self::BREAK_MINUTES.start(),
                Self::BREAK_MINUTES.end(),
                break_minutes
            )));
        }
        Ok(())
    }

    /// Flips the phase if it has run out by `now`.
    ///
    /// Returns `None` when the timer is stopped or the phase is still running.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Option<PhaseTransition> {
        if !self.enabled || now < self.phase_end {
            return None;
        }

        let duration = match self.current_phase {
            Phase::Work => {
                self.current_phase = Phase::Break;
                self.cycle_count += 1;
                self.break_minutes
            }
            Phase::Break => {
                self.current_phase = Phase::Work;
                self.work_minutes
            }
        };
        self.phase_start = now;
        self.phase_end = now + minutes(duration);

        Some(PhaseTransition {
            new_phase: self.current_phase,
            cycle_count: self.cycle_count,
            phase_start: self.phase_start,
            phase_end: self.phase_end,
        })
    }

    /// Stops the timer for good.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    /// Copies the timer state out.
    pub fn snapshot(&self) -> PomodoroSnapshot {
        PomodoroSnapshot {
            enabled: self.enabled,
            work_minutes: self.work_minutes,
            break_minutes: self.break_minutes,
            current_phase: self.current_phase,
            phase_start: self.phase_start,
            phase_end: self.phase_end,
            voice_channel_id: self.voice_channel_id,
            cycle_count: self.cycle_count,
        }
    }
}

fn minutes(count: u32) -> Duration {
    Duration::minutes(i64::from(count))
}
