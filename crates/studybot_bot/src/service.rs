//! Inbound entry points for chat platform commands.

use std::sync::Arc;
use studybot_core::{
    ActiveSessionSnapshot, ChannelId, JoinOutcome, LeaderboardEntry, LeaveOutcome,
    PomodoroSnapshot, ServerId, UserId, UserStat,
};
use studybot_error::StudyBotResult;
use studybot_interface::StudyStore;
use studybot_session::SessionRegistry;
use tracing::instrument;

/// Command surface the chat platform adapter calls into.
///
/// Every method maps one user command onto the registry or the store and
/// returns a value the adapter can render.
#[derive(Clone)]
pub struct StudyService {
    registry: Arc<SessionRegistry>,
    default_leaderboard_limit: i64,
}

impl StudyService {
    /// Creates a service over `registry` returning ten leaderboard entries
    /// by default.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            default_leaderboard_limit: 10,
        }
    }

    /// Entries returned when a leaderboard query names no limit.
    pub fn with_default_leaderboard_limit(mut self, limit: i64) -> Self {
        self.default_leaderboard_limit = limit;
        self
    }

    /// The registry behind this service.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    fn store(&self) -> &Arc<dyn StudyStore> {
        self.registry.store()
    }

    /// User asked to start or join the study session in their server.
    #[instrument(skip(self))]
    pub async fn on_join_requested(
        &self,
        server_id: ServerId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> StudyBotResult<JoinOutcome> {
        self.registry.join(server_id, user_id, channel_id).await
    }

    /// User asked to leave the study session in their server.
    #[instrument(skip(self))]
    pub async fn on_leave_requested(
        &self,
        server_id: ServerId,
        user_id: UserId,
    ) -> StudyBotResult<LeaveOutcome> {
        self.registry.leave(server_id, user_id).await
    }

    /// User asked for a pomodoro timer on the running session.
    #[instrument(skip(self))]
    pub async fn on_configure_pomodoro(
        &self,
        server_id: ServerId,
        work_minutes: u32,
        break_minutes: u32,
        voice_channel_id: Option<ChannelId>,
    ) -> StudyBotResult<PomodoroSnapshot> {
        self.registry
            .configure_pomodoro(server_id, work_minutes, break_minutes, voice_channel_id)
            .await
    }

    /// User asked to stop the running pomodoro timer.
    #[instrument(skip(self))]
    pub async fn on_stop_pomodoro(&self, server_id: ServerId) -> StudyBotResult<()> {
        self.registry.stop_pomodoro(server_id).await
    }

    /// User asked for the running pomodoro timer's state.
    pub async fn on_query_pomodoro(&self, server_id: ServerId) -> StudyBotResult<PomodoroSnapshot> {
        self.registry.pomodoro_status(server_id).await
    }

    /// User asked who is studying in their server.
    pub async fn on_query_status(&self, server_id: ServerId) -> Option<ActiveSessionSnapshot> {
        self.registry.get_active(server_id).await
    }

    /// User asked for their statistics. `None` means they have never studied
    /// or registered in this server.
    #[instrument(skip(self))]
    pub async fn on_query_stats(
        &self,
        user_id: UserId,
        server_id: ServerId,
    ) -> StudyBotResult<Option<UserStat>> {
        self.store().get_user_stat(user_id, server_id).await
    }

    /// User asked for the server leaderboard.
    ///
    /// `None` uses the default limit. Negative limits return nothing.
    #[instrument(skip(self))]
    pub async fn on_query_leaderboard(
        &self,
        server_id: ServerId,
        limit: Option<i64>,
    ) -> StudyBotResult<Vec<LeaderboardEntry>> {
        let limit = limit.unwrap_or(self.default_leaderboard_limit);
        self.store().leaderboard(server_id, limit).await
    }

    /// User asked to be registered. Returns `true` when a new record was
    /// created and `false` when one already existed.
    #[instrument(skip(self))]
    pub async fn on_register(&self, user_id: UserId, server_id: ServerId) -> StudyBotResult<bool> {
        self.store().register_user(user_id, server_id).await
    }
}
