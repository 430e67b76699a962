//! Conversions between diesel rows and core types.

use crate::{LeaderboardRow, StudySessionRow, UserStatRow};
use studybot_core::{LeaderboardEntry, UserStat, studied_minutes};

impl From<UserStatRow> for UserStat {
    fn from(row: UserStatRow) -> Self {
        Self {
            user_id: row.user_id,
            server_id: row.server_id,
            last_session_time: row.last_session_time.map(|t| t.and_utc()),
            last_session_id: row.last_session_id,
            total_study_minutes: row.total_study_minutes,
            xp: row.xp,
            level: row.level,
        }
    }
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            user_id: row.user_id,
            total_study_minutes: row.total_study_minutes,
            xp: row.xp,
            level: row.level,
        }
    }
}

impl StudySessionRow {
    /// Whole minutes between start and end, `None` while the session is open.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time
            .map(|end| studied_minutes(self.start_time.and_utc(), end.and_utc()))
    }
}
