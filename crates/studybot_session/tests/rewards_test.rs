//! Tests for the periodic XP reward tick.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use studybot_core::{
    LeaderboardEntry, ManualClock, ServerId, SessionId, UserId, UserStat, XP_AWARD_RANGE,
    XpOutcome,
};
use studybot_database::SqliteStudyStore;
use studybot_error::{DatabaseError, DatabaseErrorKind, StudyBotResult};
use studybot_interface::{Notifier, StudyEvent, StudyStore};
use studybot_session::SessionRegistry;
use tokio::sync::Notify;

const SERVER: i64 = 67890;
const CHANNEL: i64 = 555;

/// Delegates to SQLite, with hooks around `apply_xp` for one user.
struct HookedStore {
    inner: SqliteStudyStore,
    target: UserId,
    fail: bool,
    entered: Arc<Notify>,
    release: Option<Arc<Notify>>,
}

impl HookedStore {
    fn new(target: UserId) -> Self {
        Self {
            inner: SqliteStudyStore::in_memory().unwrap(),
            target,
            fail: false,
            entered: Arc::new(Notify::new()),
            release: None,
        }
    }
}

#[async_trait]
impl StudyStore for HookedStore {
    async fn get_user_stat(
        &self,
        user_id: UserId,
        server_id: ServerId,
    ) -> StudyBotResult<Option<UserStat>> {
        self.inner.get_user_stat(user_id, server_id).await
    }

    async fn create_user_stat(
        &self,
        user_id: UserId,
        server_id: ServerId,
    ) -> StudyBotResult<UserStat> {
        self.inner.create_user_stat(user_id, server_id).await
    }

    async fn register_user(&self, user_id: UserId, server_id: ServerId) -> StudyBotResult<bool> {
        self.inner.register_user(user_id, server_id).await
    }

    async fn apply_xp(
        &self,
        user_id: UserId,
        server_id: ServerId,
        delta: i64,
    ) -> StudyBotResult<XpOutcome> {
        if user_id == self.target {
            self.entered.notify_one();
            if let Some(release) = &self.release {
                release.notified().await;
            }
            if self.fail {
                return Err(DatabaseError::new(DatabaseErrorKind::Query("disk on fire".into())).into());
            }
        }
        self.inner.apply_xp(user_id, server_id, delta).await
    }

    async fn add_study_minutes(
        &self,
        user_id: UserId,
        server_id: ServerId,
        minutes: i64,
    ) -> StudyBotResult<()> {
        self.inner.add_study_minutes(user_id, server_id, minutes).await
    }

    async fn start_session(&self, server_id: ServerId) -> StudyBotResult<SessionId> {
        self.inner.start_session(server_id).await
    }

    async fn end_session(&self, session_id: SessionId) -> StudyBotResult<bool> {
        self.inner.end_session(session_id).await
    }

    async fn touch_user_session(
        &self,
        user_id: UserId,
        server_id: ServerId,
        session_id: SessionId,
    ) -> StudyBotResult<()> {
        self.inner
            .touch_user_session(user_id, server_id, session_id)
            .await
    }

    async fn leaderboard(
        &self,
        server_id: ServerId,
        limit: i64,
    ) -> StudyBotResult<Vec<LeaderboardEntry>> {
        self.inner.leaderboard(server_id, limit).await
    }

    async fn session_duration(&self, session_id: SessionId) -> StudyBotResult<Option<i64>> {
        self.inner.session_duration(session_id).await
    }
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 5, 4, 18, 0, 0).unwrap())
}

#[tokio::test]
async fn test_tick_awards_every_participant() {
    let store = Arc::new(SqliteStudyStore::in_memory().unwrap());
    let registry = SessionRegistry::new(store.clone(), Notifier::disconnected())
        .with_clock(Arc::new(clock()));

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry.join(SERVER, 2, CHANNEL).await.unwrap();
    registry.join(SERVER + 1, 3, CHANNEL).await.unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let report = registry.reward_tick(&mut rng).await;
    assert_eq!(report.sessions, 2);
    assert_eq!(report.awarded, 3);
    assert_eq!(report.failures, 0);

    for (user, server) in [(1, SERVER), (2, SERVER), (3, SERVER + 1)] {
        let stat = store.get_user_stat(user, server).await.unwrap().unwrap();
        assert!(XP_AWARD_RANGE.contains(&stat.xp));
        assert_eq!(stat.level, 1);
    }
}

#[tokio::test]
async fn test_tick_without_sessions_does_nothing() {
    let store = Arc::new(SqliteStudyStore::in_memory().unwrap());
    let registry = SessionRegistry::new(store, Notifier::disconnected());

    let mut rng = StdRng::seed_from_u64(7);
    let report = registry.reward_tick(&mut rng).await;
    assert_eq!(report.sessions, 0);
    assert_eq!(report.awarded, 0);
}

#[tokio::test]
async fn test_tick_emits_level_up_event() {
    let store = Arc::new(SqliteStudyStore::in_memory().unwrap());
    let (notifier, mut receivers) = Notifier::channel();
    let registry = SessionRegistry::new(store.clone(), notifier).with_clock(Arc::new(clock()));

    // 150 of the 155 XP needed to leave level 1
    store.apply_xp(1, SERVER, 150).await.unwrap();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let report = registry.reward_tick(&mut rng).await;
    assert_eq!(report.level_ups, 1);

    match receivers.events.try_recv().unwrap() {
        StudyEvent::LevelUp {
            server_id,
            user_id,
            new_level,
            awarded_xp,
            channel_id,
        } => {
            assert_eq!(server_id, SERVER);
            assert_eq!(user_id, 1);
            assert_eq!(new_level, 2);
            assert!(XP_AWARD_RANGE.contains(&awarded_xp));
            assert_eq!(channel_id, CHANNEL);
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(receivers.events.try_recv().is_err());

    let stat = store.get_user_stat(1, SERVER).await.unwrap().unwrap();
    assert_eq!(stat.level, 2);
    assert!(stat.xp <= 20);
}

#[tokio::test]
async fn test_tick_continues_past_storage_failure() {
    let mut hooked = HookedStore::new(1);
    hooked.fail = true;
    let store = Arc::new(hooked);
    let registry = SessionRegistry::new(store.clone(), Notifier::disconnected())
        .with_clock(Arc::new(clock()));

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry.join(SERVER, 2, CHANNEL).await.unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let report = registry.reward_tick(&mut rng).await;
    assert_eq!(report.failures, 1);
    assert_eq!(report.awarded, 1);

    let stat = store.get_user_stat(2, SERVER).await.unwrap().unwrap();
    assert!(XP_AWARD_RANGE.contains(&stat.xp));
    let failed = store.get_user_stat(1, SERVER).await.unwrap().unwrap();
    assert_eq!(failed.xp, 0);
}

#[tokio::test]
async fn test_user_leaving_mid_tick_is_not_rewarded() {
    let release = Arc::new(Notify::new());
    let mut hooked = HookedStore::new(1);
    hooked.release = Some(Arc::clone(&release));
    let entered = Arc::clone(&hooked.entered);
    let store = Arc::new(hooked);

    let registry = Arc::new(
        SessionRegistry::new(store.clone(), Notifier::disconnected())
            .with_clock(Arc::new(clock())),
    );
    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry.join(SERVER, 2, CHANNEL).await.unwrap();

    let tick = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(7);
            registry.reward_tick(&mut rng).await
        })
    };

    // The tick is now parked inside user 1's award, holding the server lock
    entered.notified().await;
    let leave = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move { registry.leave(SERVER, 2).await.unwrap() })
    };
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    release.notify_one();

    let report = tick.await.unwrap();
    leave.await.unwrap();

    assert_eq!(report.awarded, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failures, 0);

    let stayed = store.get_user_stat(1, SERVER).await.unwrap().unwrap();
    assert!(XP_AWARD_RANGE.contains(&stayed.xp));
    let left = store.get_user_stat(2, SERVER).await.unwrap().unwrap();
    assert_eq!(left.xp, 0);
}
