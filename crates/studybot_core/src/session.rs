//! Session lifecycle outcomes and snapshots.

use crate::{ChannelId, PomodoroSnapshot, ServerId, SessionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum JoinOutcome {
    /// The user opened a new session in an idle server
    #[display("started")]
    Started,
    /// The user joined a session already in progress
    #[display("joined")]
    Joined,
    /// The user was already part of the running session
    #[display("already joined")]
    AlreadyJoined,
}

/// Result of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveOutcome {
    /// The user was not part of a session in this server
    NotInSession,
    /// The user left and others are still studying
    LeftSessionContinues {
        /// Participants still in the session
        remaining: usize,
        /// Minutes credited to the leaving user
        studied_minutes: i64,
    },
    /// The last participant left and the session closed
    LeftSessionEnded {
        /// Minutes credited to the leaving user
        studied_minutes: i64,
    },
}

impl LeaveOutcome {
    /// Minutes credited by this leave, zero when the user was not in a session.
    pub fn studied_minutes(&self) -> i64 {
        match self {
            Self::NotInSession => 0,
            Self::LeftSessionContinues {
                studied_minutes, ..
            }
            | Self::LeftSessionEnded { studied_minutes } => *studied_minutes,
        }
    }
}

/// Whole minutes elapsed between `start` and `now`, never negative.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use studybot_core::studied_minutes;
///
/// let start = Utc::now();
/// assert_eq!(studied_minutes(start, start + Duration::seconds(179)), 2);
/// assert_eq!(studied_minutes(start, start - Duration::minutes(5)), 0);
/// ```
pub fn studied_minutes(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_minutes().max(0)
}

/// Frozen copy of a running session, safe to hold while the registry moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSessionSnapshot {
    /// Server the session runs in
    pub server_id: ServerId,
    /// Stored id of the session
    pub session_id: SessionId,
    /// Participants in ascending user id order
    pub participants: Vec<UserId>,
    /// When the first participant joined
    pub start_time: DateTime<Utc>,
    /// Channel the session was started from
    pub channel_id: ChannelId,
    /// Attached timer, if one was started
    pub pomodoro: Option<PomodoroSnapshot>,
}

impl ActiveSessionSnapshot {
    /// Number of users currently studying.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Whether `user_id` is part of this session.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.participants.binary_search(&user_id).is_ok()
    }
}
