//! Tests for joining and leaving study sessions.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use studybot_core::{JoinOutcome, LeaveOutcome, ManualClock};
use studybot_database::SqliteStudyStore;
use studybot_interface::{Notifier, StudyStore};
use studybot_session::SessionRegistry;

const SERVER: i64 = 67890;
const CHANNEL: i64 = 555;

fn setup() -> (SessionRegistry, Arc<SqliteStudyStore>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 5, 4, 18, 0, 0).unwrap());
    let store = Arc::new(
        SqliteStudyStore::in_memory()
            .unwrap()
            .with_clock(Arc::new(clock.clone())),
    );
    let registry = SessionRegistry::new(store.clone(), Notifier::disconnected())
        .with_clock(Arc::new(clock.clone()));
    (registry, store, clock)
}

#[tokio::test]
async fn test_first_join_starts_session() {
    let (registry, store, _clock) = setup();

    assert_eq!(
        registry.join(SERVER, 1, CHANNEL).await.unwrap(),
        JoinOutcome::Started
    );

    let active = registry.get_active(SERVER).await.unwrap();
    assert_eq!(active.participants, vec![1]);
    assert_eq!(active.channel_id, CHANNEL);
    assert!(active.pomodoro.is_none());

    let stat = store.get_user_stat(1, SERVER).await.unwrap().unwrap();
    assert_eq!(stat.last_session_id, Some(active.session_id));
}

#[tokio::test]
async fn test_join_is_idempotent() {
    let (registry, _store, _clock) = setup();

    assert_eq!(
        registry.join(SERVER, 1, CHANNEL).await.unwrap(),
        JoinOutcome::Started
    );
    assert_eq!(
        registry.join(SERVER, 2, CHANNEL).await.unwrap(),
        JoinOutcome::Joined
    );
    assert_eq!(
        registry.join(SERVER, 1, CHANNEL).await.unwrap(),
        JoinOutcome::AlreadyJoined
    );

    let active = registry.get_active(SERVER).await.unwrap();
    assert_eq!(active.participant_count(), 2);
    assert!(active.contains(1));
    assert!(active.contains(2));
}

#[tokio::test]
async fn test_leave_credits_minutes_and_ends_session() {
    let (registry, store, clock) = setup();

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    let session_id = registry.get_active(SERVER).await.unwrap().session_id;

    clock.advance(Duration::minutes(3) + Duration::seconds(20));
    let outcome = registry.leave(SERVER, 1).await.unwrap();
    assert_eq!(
        outcome,
        LeaveOutcome::LeftSessionEnded { studied_minutes: 3 }
    );
    assert!(registry.get_active(SERVER).await.is_none());

    let stat = store.get_user_stat(1, SERVER).await.unwrap().unwrap();
    assert_eq!(stat.total_study_minutes, 3);
    assert_eq!(store.session_duration(session_id).await.unwrap(), Some(3));
}

#[tokio::test]
async fn test_leave_with_others_remaining_continues() {
    let (registry, store, clock) = setup();

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry.join(SERVER, 2, CHANNEL).await.unwrap();
    let session_id = registry.get_active(SERVER).await.unwrap().session_id;

    clock.advance(Duration::minutes(10));
    let outcome = registry.leave(SERVER, 2).await.unwrap();
    assert_eq!(
        outcome,
        LeaveOutcome::LeftSessionContinues {
            remaining: 1,
            studied_minutes: 10,
        }
    );

    let active = registry.get_active(SERVER).await.unwrap();
    assert_eq!(active.participants, vec![1]);
    assert_eq!(store.session_duration(session_id).await.unwrap(), None);
}

#[tokio::test]
async fn test_minutes_count_from_session_start() {
    let (registry, store, clock) = setup();

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    clock.advance(Duration::minutes(20));
    registry.join(SERVER, 2, CHANNEL).await.unwrap();
    clock.advance(Duration::minutes(5));

    registry.leave(SERVER, 2).await.unwrap();
    let stat = store.get_user_stat(2, SERVER).await.unwrap().unwrap();
    assert_eq!(stat.total_study_minutes, 25);
}

#[tokio::test]
async fn test_leave_without_session_is_not_in_session() {
    let (registry, _store, _clock) = setup();

    assert_eq!(
        registry.leave(SERVER, 1).await.unwrap(),
        LeaveOutcome::NotInSession
    );

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    assert_eq!(
        registry.leave(SERVER, 2).await.unwrap(),
        LeaveOutcome::NotInSession
    );
    assert!(registry.get_active(SERVER).await.unwrap().contains(1));
}

#[tokio::test]
async fn test_short_stay_writes_no_minutes() {
    let (registry, store, clock) = setup();

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    clock.advance(Duration::seconds(59));
    assert_eq!(
        registry.leave(SERVER, 1).await.unwrap(),
        LeaveOutcome::LeftSessionEnded { studied_minutes: 0 }
    );

    let stat = store.get_user_stat(1, SERVER).await.unwrap().unwrap();
    assert_eq!(stat.total_study_minutes, 0);
}

#[tokio::test]
async fn test_servers_are_independent() {
    let (registry, _store, _clock) = setup();

    assert_eq!(
        registry.join(SERVER, 1, CHANNEL).await.unwrap(),
        JoinOutcome::Started
    );
    assert_eq!(
        registry.join(SERVER + 1, 1, CHANNEL + 1).await.unwrap(),
        JoinOutcome::Started
    );

    let first = registry.get_active(SERVER).await.unwrap();
    let second = registry.get_active(SERVER + 1).await.unwrap();
    assert_ne!(first.session_id, second.session_id);

    registry.leave(SERVER, 1).await.unwrap();
    assert!(registry.get_active(SERVER).await.is_none());
    assert!(registry.get_active(SERVER + 1).await.is_some());

    let all = registry.active_sessions().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].server_id, SERVER + 1);
}

#[tokio::test]
async fn test_rejoin_after_end_starts_new_session() {
    let (registry, _store, _clock) = setup();

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    let first = registry.get_active(SERVER).await.unwrap().session_id;
    registry.leave(SERVER, 1).await.unwrap();

    assert_eq!(
        registry.join(SERVER, 1, CHANNEL).await.unwrap(),
        JoinOutcome::Started
    );
    let second = registry.get_active(SERVER).await.unwrap().session_id;
    assert!(second > first);
}

#[tokio::test]
async fn test_concurrent_first_joins_start_one_session() {
    let (registry, _store, _clock) = setup();
    let registry = Arc::new(registry);

    let mut handles = Vec::new();
    for user in 1..=8 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            registry.join(SERVER, user, CHANNEL).await.unwrap()
        }));
    }

    let mut started = 0;
    for handle in handles {
        if handle.await.unwrap() == JoinOutcome::Started {
            started += 1;
        }
    }
    assert_eq!(started, 1);
    assert_eq!(
        registry.get_active(SERVER).await.unwrap().participant_count(),
        8
    );
}

#[tokio::test]
async fn test_ended_session_releases_server_entry() {
    let (registry, _store, clock) = setup();
    const OTHER: i64 = 11111;

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry.join(OTHER, 2, CHANNEL).await.unwrap();
    assert_eq!(registry.tracked_servers(), 2);

    clock.advance(Duration::minutes(10));
    registry.leave(SERVER, 1).await.unwrap();
    assert_eq!(registry.tracked_servers(), 1);
    assert!(registry.get_active(SERVER).await.is_none());
    assert!(registry.get_active(OTHER).await.is_some());

    // Leaving again after the entry is gone is harmless.
    assert_eq!(
        registry.leave(SERVER, 1).await.unwrap(),
        LeaveOutcome::NotInSession
    );

    assert_eq!(
        registry.join(SERVER, 1, CHANNEL).await.unwrap(),
        JoinOutcome::Started
    );
    assert_eq!(registry.tracked_servers(), 2);

    registry.leave(OTHER, 2).await.unwrap();
    registry.leave(SERVER, 1).await.unwrap();
    assert_eq!(registry.tracked_servers(), 0);
}
