//! Persistence trait for user statistics and study sessions.

use async_trait::async_trait;
use studybot_core::{LeaderboardEntry, ServerId, SessionId, UserId, UserStat, XpOutcome};
use studybot_error::StudyBotResult;

/// Durable storage for per-user statistics and study session records.
///
/// Every call completes its write before returning; there is no batching
/// and no caching layer.
#[async_trait]
pub trait StudyStore: Send + Sync {
    /// Load a user's stats, `None` if the user has never been recorded.
    async fn get_user_stat(
        &self,
        user_id: UserId,
        server_id: ServerId,
    ) -> StudyBotResult<Option<UserStat>>;

    /// Insert default stats for a new user.
    ///
    /// Fails with `DuplicateKey` if the user already has a row.
    async fn create_user_stat(&self, user_id: UserId, server_id: ServerId)
    -> StudyBotResult<UserStat>;

    /// Insert default stats unless a row already exists.
    ///
    /// Returns `true` when a row was created.
    async fn register_user(&self, user_id: UserId, server_id: ServerId) -> StudyBotResult<bool>;

    /// Apply an XP award under the leveling rule, creating the row if needed.
    ///
    /// Fails with `InvalidArgument` if `delta` is negative; nothing is written.
    async fn apply_xp(
        &self,
        user_id: UserId,
        server_id: ServerId,
        delta: i64,
    ) -> StudyBotResult<XpOutcome>;

    /// Add studied minutes to a user's total. Non-positive values are ignored.
    async fn add_study_minutes(
        &self,
        user_id: UserId,
        server_id: ServerId,
        minutes: i64,
    ) -> StudyBotResult<()>;

    /// Record a new open session and return its id.
    async fn start_session(&self, server_id: ServerId) -> StudyBotResult<SessionId>;

    /// Close an open session.
    ///
    /// Returns `false` without writing if the session is unknown or already closed.
    async fn end_session(&self, session_id: SessionId) -> StudyBotResult<bool>;

    /// Remember the session a user most recently joined.
    async fn touch_user_session(
        &self,
        user_id: UserId,
        server_id: ServerId,
        session_id: SessionId,
    ) -> StudyBotResult<()>;

    /// Top users of a server by level, then XP, then study minutes.
    async fn leaderboard(
        &self,
        server_id: ServerId,
        limit: i64,
    ) -> StudyBotResult<Vec<LeaderboardEntry>>;

    /// Whole minutes a closed session lasted, `None` while open or unknown.
    async fn session_duration(&self, session_id: SessionId) -> StudyBotResult<Option<i64>>;
}
