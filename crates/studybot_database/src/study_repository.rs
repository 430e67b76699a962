//! SQLite implementation of StudyStore.

use crate::schema::{study_sessions, userstats};
use crate::{
    DatabaseResult, LeaderboardRow, NewStudySession, NewUserStat, SqlitePool, StudySessionRow,
    UserStatRow, establish_pool,
};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use studybot_core::{
    Clock, LeaderboardEntry, ServerId, SessionId, SystemClock, UserId, UserStat, XpOutcome,
    apply_award,
};
use studybot_error::{DatabaseError, DatabaseErrorKind, SessionError, StudyBotResult};
use studybot_interface::StudyStore;
use tracing::{debug, instrument};

/// SQLite implementation of [`StudyStore`] using Diesel.
///
/// Each call checks a connection out of the pool on tokio's blocking
/// thread pool and runs in its own transaction, so a failed call never
/// leaves a partial write behind.
///
/// # Example
/// ```no_run
/// use studybot_database::SqliteStudyStore;
/// use studybot_interface::StudyStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStudyStore::connect("studybot.db", 8)?;
///     let outcome = store.apply_xp(7, 42, 20).await?;
///     println!("level {}", outcome.new_level);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SqliteStudyStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SqliteStudyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStudyStore")
            .field("pool", &self.pool.state())
            .field("clock", &self.clock)
            .finish()
    }
}

impl SqliteStudyStore {
    /// Wrap an existing pool. Timestamps come from the system clock.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            clock: Arc::new(SystemClock),
        }
    }

    /// Open (and migrate) the database at `database_url`.
    pub fn connect(database_url: &str, max_connections: u32) -> DatabaseResult<Self> {
        Ok(Self::new(establish_pool(database_url, max_connections)?))
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> DatabaseResult<Self> {
        Self::connect(":memory:", 1)
    }

    /// Use `clock` for session and touch timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    async fn run<T, F>(&self, f: F) -> StudyBotResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> DatabaseResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Task(e.to_string())))?;

        Ok(result?)
    }
}

fn find_stat(
    conn: &mut SqliteConnection,
    user_id: UserId,
    server_id: ServerId,
) -> DatabaseResult<Option<UserStatRow>> {
    Ok(userstats::table
        .find((user_id, server_id))
        .select(UserStatRow::as_select())
        .first(conn)
        .optional()?)
}

fn insert_default_stat(
    conn: &mut SqliteConnection,
    user_id: UserId,
    server_id: ServerId,
) -> DatabaseResult<bool> {
    let inserted = diesel::insert_or_ignore_into(userstats::table)
        .values(NewUserStat { user_id, server_id })
        .execute(conn)?;
    Ok(inserted == 1)
}

#[async_trait]
impl StudyStore for SqliteStudyStore {
    #[instrument(skip(self))]
    async fn get_user_stat(
        &self,
        user_id: UserId,
        server_id: ServerId,
    ) -> StudyBotResult<Option<UserStat>> {
        let row = self
            .run(move |conn| find_stat(conn, user_id, server_id))
            .await?;
        Ok(row.map(UserStat::from))
    }

    #[instrument(skip(self))]
    async fn create_user_stat(
        &self,
        user_id: UserId,
        server_id: ServerId,
    ) -> StudyBotResult<UserStat> {
        let row = self
            .run(move |conn| {
                diesel::insert_into(userstats::table)
                    .values(NewUserStat { user_id, server_id })
                    .returning(UserStatRow::as_returning())
                    .get_result(conn)
                    .map_err(|e| {
                        let err = DatabaseError::from(e);
                        if err.is_duplicate_key() {
                            DatabaseError::new(DatabaseErrorKind::DuplicateKey(format!(
                                "userstats row for user {} in server {} already exists",
                                user_id, server_id
                            )))
                        } else {
                            err
                        }
                    })
            })
            .await?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn register_user(&self, user_id: UserId, server_id: ServerId) -> StudyBotResult<bool> {
        self.run(move |conn| insert_default_stat(conn, user_id, server_id))
            .await
    }

    #[instrument(skip(self))]
    async fn apply_xp(
        &self,
        user_id: UserId,
        server_id: ServerId,
        delta: i64,
    ) -> StudyBotResult<XpOutcome> {
        if delta < 0 {
            return Err(SessionError::invalid_argument(format!(
                "XP award must not be negative, got {}",
                delta
            ))
            .into());
        }

        let outcome = self
            .run(move |conn| {
                conn.immediate_transaction::<_, DatabaseError, _>(|conn| {
                    let (xp, level) = match find_stat(conn, user_id, server_id)? {
                        Some(row) => (row.xp, row.level),
                        None => {
                            insert_default_stat(conn, user_id, server_id)?;
                            (0, 1)
                        }
                    };

                    let progress = apply_award(xp, level, delta);

                    diesel::update(userstats::table.find((user_id, server_id)))
                        .set((
                            userstats::xp.eq(progress.xp),
                            userstats::level.eq(progress.level),
                        ))
                        .execute(conn)?;

                    Ok(XpOutcome {
                        leveled_up: progress.leveled_up,
                        new_level: progress.level,
                        awarded_xp: delta,
                    })
                })
            })
            .await?;

        debug!(?outcome, "Applied XP");
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn add_study_minutes(
        &self,
        user_id: UserId,
        server_id: ServerId,
        minutes: i64,
    ) -> StudyBotResult<()> {
        if minutes <= 0 {
            return Ok(());
        }

        self.run(move |conn| {
            diesel::insert_into(userstats::table)
                .values((
                    userstats::user_id.eq(user_id),
                    userstats::server_id.eq(server_id),
                    userstats::total_study_minutes.eq(minutes),
                ))
                .on_conflict((userstats::user_id, userstats::server_id))
                .do_update()
                .set(userstats::total_study_minutes.eq(userstats::total_study_minutes + minutes))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn start_session(&self, server_id: ServerId) -> StudyBotResult<SessionId> {
        let start_time = self.clock.now().naive_utc();
        self.run(move |conn| {
            Ok(diesel::insert_into(study_sessions::table)
                .values(NewStudySession {
                    server_id,
                    start_time,
                })
                .returning(study_sessions::session_id)
                .get_result(conn)?)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn end_session(&self, session_id: SessionId) -> StudyBotResult<bool> {
        let end_time = self.clock.now().naive_utc();
        let updated = self
            .run(move |conn| {
                Ok(diesel::update(
                    study_sessions::table
                        .find(session_id)
                        .filter(study_sessions::end_time.is_null()),
                )
                .set(study_sessions::end_time.eq(Some(end_time)))
                .execute(conn)?)
            })
            .await?;
        Ok(updated == 1)
    }

    #[instrument(skip(self))]
    async fn touch_user_session(
        &self,
        user_id: UserId,
        server_id: ServerId,
        session_id: SessionId,
    ) -> StudyBotResult<()> {
        let touched_at = self.clock.now().naive_utc();
        self.run(move |conn| {
            diesel::insert_into(userstats::table)
                .values((
                    userstats::user_id.eq(user_id),
                    userstats::server_id.eq(server_id),
                    userstats::last_session_id.eq(Some(session_id)),
                    userstats::last_session_time.eq(Some(touched_at)),
                ))
                .on_conflict((userstats::user_id, userstats::server_id))
                .do_update()
                .set((
                    userstats::last_session_id.eq(Some(session_id)),
                    userstats::last_session_time.eq(Some(touched_at)),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn leaderboard(
        &self,
        server_id: ServerId,
        limit: i64,
    ) -> StudyBotResult<Vec<LeaderboardEntry>> {
        let rows = self
            .run(move |conn| {
                Ok(userstats::table
                    .filter(userstats::server_id.eq(server_id))
                    .order((
                        userstats::level.desc(),
                        userstats::xp.desc(),
                        userstats::total_study_minutes.desc(),
                    ))
                    .limit(limit.max(0))
                    .select(LeaderboardRow::as_select())
                    .load(conn)?)
            })
            .await?;
        Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn session_duration(&self, session_id: SessionId) -> StudyBotResult<Option<i64>> {
        let row: Option<StudySessionRow> = self
            .run(move |conn| {
                Ok(study_sessions::table
                    .find(session_id)
                    .select(StudySessionRow::as_select())
                    .first(conn)
                    .optional()?)
            })
            .await?;
        Ok(row.and_then(|row| row.duration_minutes()))
    }
}
