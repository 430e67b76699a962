//! Tests for pomodoro timers on running sessions.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use studybot_core::{Clock, ManualClock, Phase};
use studybot_database::SqliteStudyStore;
use studybot_error::SessionErrorKind;
use studybot_interface::{EventReceivers, Notifier, StudyEvent, VoiceNotification};
use studybot_session::SessionRegistry;

const SERVER: i64 = 67890;
const CHANNEL: i64 = 555;
const VOICE: i64 = 777;

fn setup() -> (SessionRegistry, EventReceivers, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 5, 4, 18, 0, 0).unwrap());
    let store = Arc::new(SqliteStudyStore::in_memory().unwrap());
    let (notifier, receivers) = Notifier::channel();
    let registry = SessionRegistry::new(store, notifier).with_clock(Arc::new(clock.clone()));
    (registry, receivers, clock)
}

fn phase_changed(receivers: &mut EventReceivers) -> (Phase, u32) {
    match receivers.events.try_recv().unwrap() {
        StudyEvent::PomodoroPhaseChanged {
            server_id,
            new_phase,
            cycle_count,
            channel_id,
            ..
        } => {
            assert_eq!(server_id, SERVER);
            assert_eq!(channel_id, CHANNEL);
            (new_phase, cycle_count)
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_configure_requires_session() {
    let (registry, _receivers, _clock) = setup();

    let err = registry
        .configure_pomodoro(SERVER, 25, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.session_kind(),
        Some(SessionErrorKind::NoActiveSession(SERVER))
    ));
}

#[tokio::test]
async fn test_invalid_lengths_are_rejected_without_state() {
    let (registry, _receivers, _clock) = setup();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();

    for (work, brk) in [(0, 5), (121, 5), (25, 0), (25, 61), (25, 200)] {
        let err = registry
            .configure_pomodoro(SERVER, work, brk, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.session_kind(),
            Some(SessionErrorKind::InvalidArgument(_))
        ));
    }
    assert!(registry.get_active(SERVER).await.unwrap().pomodoro.is_none());
}

#[tokio::test]
async fn test_invalid_lengths_win_over_missing_session() {
    let (registry, _receivers, _clock) = setup();

    let err = registry
        .configure_pomodoro(SERVER, 0, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.session_kind(),
        Some(SessionErrorKind::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_configure_starts_in_work() {
    let (registry, _receivers, clock) = setup();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();

    let snapshot = registry
        .configure_pomodoro(SERVER, 25, 5, Some(VOICE))
        .await
        .unwrap();
    assert!(snapshot.enabled);
    assert_eq!(snapshot.current_phase, Phase::Work);
    assert_eq!(snapshot.cycle_count, 1);
    assert_eq!(snapshot.phase_start, clock.now());
    assert_eq!(snapshot.phase_end, clock.now() + Duration::minutes(25));
    assert_eq!(registry.pomodoro_status(SERVER).await.unwrap(), snapshot);
}

#[tokio::test]
async fn test_scan_flips_phases() {
    let (registry, mut receivers, clock) = setup();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry
        .configure_pomodoro(SERVER, 1, 1, None)
        .await
        .unwrap();

    // Still inside the first work phase
    clock.advance(Duration::seconds(30));
    let report = registry.pomodoro_scan().await;
    assert_eq!(report.timers, 1);
    assert_eq!(report.transitions, 0);

    clock.advance(Duration::seconds(31));
    assert_eq!(registry.pomodoro_scan().await.transitions, 1);
    assert_eq!(phase_changed(&mut receivers), (Phase::Break, 2));

    clock.advance(Duration::seconds(61));
    assert_eq!(registry.pomodoro_scan().await.transitions, 1);
    assert_eq!(phase_changed(&mut receivers), (Phase::Work, 2));

    let status = registry.pomodoro_status(SERVER).await.unwrap();
    assert_eq!(status.current_phase, Phase::Work);
    assert_eq!(status.cycle_count, 2);
}

#[tokio::test]
async fn test_scan_requests_voice_cue() {
    let (registry, mut receivers, clock) = setup();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry
        .configure_pomodoro(SERVER, 1, 1, Some(VOICE))
        .await
        .unwrap();

    clock.advance(Duration::minutes(1));
    registry.pomodoro_scan().await;

    assert_eq!(
        receivers.voice.try_recv().unwrap(),
        VoiceNotification {
            voice_channel_id: VOICE,
            phase: Phase::Break,
        }
    );
}

#[tokio::test]
async fn test_scan_without_voice_channel_sends_no_cue() {
    let (registry, mut receivers, clock) = setup();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry
        .configure_pomodoro(SERVER, 1, 1, None)
        .await
        .unwrap();

    clock.advance(Duration::minutes(1));
    registry.pomodoro_scan().await;
    assert!(receivers.events.try_recv().is_ok());
    assert!(receivers.voice.try_recv().is_err());
}

#[tokio::test]
async fn test_stop_pomodoro() {
    let (registry, mut receivers, clock) = setup();

    let err = registry.stop_pomodoro(SERVER).await.unwrap_err();
    assert!(matches!(
        err.session_kind(),
        Some(SessionErrorKind::NoActiveSession(SERVER))
    ));

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    let err = registry.stop_pomodoro(SERVER).await.unwrap_err();
    assert!(matches!(
        err.session_kind(),
        Some(SessionErrorKind::NoPomodoroActive(SERVER))
    ));

    registry
        .configure_pomodoro(SERVER, 1, 1, None)
        .await
        .unwrap();
    registry.stop_pomodoro(SERVER).await.unwrap();

    // A stopped timer never flips and cannot be stopped again
    clock.advance(Duration::minutes(5));
    let report = registry.pomodoro_scan().await;
    assert_eq!(report.timers, 0);
    assert!(receivers.events.try_recv().is_err());

    let err = registry.stop_pomodoro(SERVER).await.unwrap_err();
    assert!(matches!(
        err.session_kind(),
        Some(SessionErrorKind::NoPomodoroActive(SERVER))
    ));
    assert!(registry.pomodoro_status(SERVER).await.is_err());
}

#[tokio::test]
async fn test_reconfigure_replaces_timer() {
    let (registry, _receivers, clock) = setup();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry
        .configure_pomodoro(SERVER, 1, 1, None)
        .await
        .unwrap();

    clock.advance(Duration::minutes(1));
    registry.pomodoro_scan().await;

    let snapshot = registry
        .configure_pomodoro(SERVER, 50, 10, None)
        .await
        .unwrap();
    assert_eq!(snapshot.current_phase, Phase::Work);
    assert_eq!(snapshot.cycle_count, 1);
    assert_eq!(snapshot.work_minutes, 50);
}

#[tokio::test]
async fn test_timer_ends_with_session() {
    let (registry, _receivers, _clock) = setup();
    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    registry
        .configure_pomodoro(SERVER, 25, 5, None)
        .await
        .unwrap();

    registry.leave(SERVER, 1).await.unwrap();
    assert_eq!(registry.pomodoro_scan().await.timers, 0);

    registry.join(SERVER, 1, CHANNEL).await.unwrap();
    let err = registry.pomodoro_status(SERVER).await.unwrap_err();
    assert!(matches!(
        err.session_kind(),
        Some(SessionErrorKind::NoPomodoroActive(SERVER))
    ));
}
