//! Live state of one server.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use studybot_core::{ActiveSessionSnapshot, ChannelId, PomodoroState, ServerId, SessionId, UserId};

/// Registry entry for one server.
#[derive(Debug, Default)]
pub(crate) struct ServerSlot {
    pub(crate) session: Option<ActiveSession>,
}

impl ServerSlot {
    /// Whether `user_id` is still studying in session `session_id`.
    pub(crate) fn is_participant(&self, session_id: SessionId, user_id: UserId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.session_id == session_id && s.participants.contains(&user_id))
    }
}

/// Running study session.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub(crate) session_id: SessionId,
    pub(crate) participants: BTreeSet<UserId>,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) channel_id: ChannelId,
    pub(crate) pomodoro: Option<PomodoroState>,
}

impl ActiveSession {
    pub(crate) fn new(
        session_id: SessionId,
        start_time: DateTime<Utc>,
        channel_id: ChannelId,
    ) -> Self {
        Self {
            session_id,
            participants: BTreeSet::new(),
            start_time,
            channel_id,
            pomodoro: None,
        }
    }

    pub(crate) fn snapshot(&self, server_id: ServerId) -> ActiveSessionSnapshot {
        ActiveSessionSnapshot {
            server_id,
            session_id: self.session_id,
            participants: self.participants.iter().copied().collect(),
            start_time: self.start_time,
            channel_id: self.channel_id,
            pomodoro: self.pomodoro.as_ref().map(PomodoroState::snapshot),
        }
    }
}
