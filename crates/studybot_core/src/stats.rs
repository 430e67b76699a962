//! Persistent per-user statistics.

use crate::{ServerId, SessionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Study statistics of one user within one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStat {
    /// User the row belongs to
    pub user_id: UserId,
    /// Server the row is scoped to
    pub server_id: ServerId,
    /// When the user last joined a session
    pub last_session_time: Option<DateTime<Utc>>,
    /// The session the user last joined
    pub last_session_id: Option<SessionId>,
    /// Minutes credited across all sessions
    pub total_study_minutes: i64,
    /// XP accumulated within the current level
    pub xp: i64,
    /// Current level, starting at 1
    pub level: i64,
}

impl UserStat {
    /// Stats of a user who has never earned anything.
    pub fn new(user_id: UserId, server_id: ServerId) -> Self {
        Self {
            user_id,
            server_id,
            last_session_time: None,
            last_session_id: None,
            total_study_minutes: 0,
            xp: 0,
            level: 1,
        }
    }
}

/// One ranked row of a server leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Ranked user
    pub user_id: UserId,
    /// Minutes credited across all sessions
    pub total_study_minutes: i64,
    /// XP within the current level
    pub xp: i64,
    /// Current level
    pub level: i64,
}

/// What an XP award did to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpOutcome {
    /// Whether the award crossed a level threshold
    pub leveled_up: bool,
    /// Level after the award
    pub new_level: i64,
    /// XP granted by the award
    pub awarded_xp: i64,
}
