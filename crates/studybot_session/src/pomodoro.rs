//! Pomodoro timers attached to running sessions.

use crate::{PomodoroScanReport, SessionRegistry};

use studybot_core::{ChannelId, PomodoroSnapshot, PomodoroState, ServerId};
use studybot_error::{SessionError, SessionErrorKind, StudyBotResult};
use studybot_interface::{StudyEvent, VoiceNotification};
use tracing::{debug, info, instrument};

impl SessionRegistry {
    /// Starts (or restarts) a pomodoro timer on the session in `server_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `work_minutes` is outside 1..=120 or
    ///   `break_minutes` outside 1..=60; nothing is changed
    /// - `NoActiveSession` if no session is running in the server
    #[instrument(skip(self))]
    pub async fn configure_pomodoro(
        &self,
        server_id: ServerId,
        work_minutes: u32,
        break_minutes: u32,
        voice_channel_id: Option<ChannelId>,
    ) -> StudyBotResult<PomodoroSnapshot> {
        PomodoroState::validate(work_minutes, break_minutes)?;

        let slot = self
            .existing_slot(server_id)
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveSession(server_id)))?;
        let mut slot = slot.lock().await;
        let session = slot
            .session
            .as_mut()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveSession(server_id)))?;

        let timer = PomodoroState::configure(
            self.clock.now(),
            work_minutes,
            break_minutes,
            voice_channel_id,
        )?;
        let snapshot = timer.snapshot();
        session.pomodoro = Some(timer);

        info!(phase_end = %snapshot.phase_end, "Pomodoro timer started");
        Ok(snapshot)
    }

    /// Stops the pomodoro timer in `server_id` for good.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if no session is running in the server
    /// - `NoPomodoroActive` if the session has no running timer
    #[instrument(skip(self))]
    pub async fn stop_pomodoro(&self, server_id: ServerId) -> StudyBotResult<()> {
        let slot = self
            .existing_slot(server_id)
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveSession(server_id)))?;
        let mut slot = slot.lock().await;
        let session = slot
            .session
            .as_mut()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveSession(server_id)))?;

        match session.pomodoro.as_mut() {
            Some(timer) if *timer.enabled() => {
                timer.stop();
                info!(cycle_count = *timer.cycle_count(), "Pomodoro timer stopped");
                Ok(())
            }
            _ => Err(SessionError::new(SessionErrorKind::NoPomodoroActive(server_id)).into()),
        }
    }

    /// Current state of the running pomodoro timer in `server_id`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SessionRegistry::stop_pomodoro`].
    pub async fn pomodoro_status(&self, server_id: ServerId) -> StudyBotResult<PomodoroSnapshot> {
        let slot = self
            .existing_slot(server_id)
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveSession(server_id)))?;
        let slot = slot.lock().await;
        let session = slot
            .session
            .as_ref()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveSession(server_id)))?;

        session
            .pomodoro
            .as_ref()
            .filter(|timer| *timer.enabled())
            .map(PomodoroState::snapshot)
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoPomodoroActive(server_id)).into())
    }

    /// Flips every running timer whose phase has run out.
    ///
    /// Each flip emits a phase-change event and, when the timer has a voice
    /// channel, a voice cue request. Neither can fail the scan.
    #[instrument(skip_all)]
    pub async fn pomodoro_scan(&self) -> PomodoroScanReport {
        let mut report = PomodoroScanReport::default();
        let now = self.clock.now();

        for (server_id, slot) in self.slots() {
            let mut slot = slot.lock().await;
            let Some(session) = slot.session.as_mut() else {
                continue;
            };
            let channel_id = session.channel_id;
            let Some(timer) = session.pomodoro.as_mut().filter(|timer| *timer.enabled()) else {
                continue;
            };
            report.timers += 1;

            let Some(transition) = timer.advance(now) else {
                continue;
            };
            report.transitions += 1;
            info!(
                server_id,
                phase = %transition.new_phase,
                cycle_count = transition.cycle_count,
                "Pomodoro phase changed"
            );

            self.notifier.emit(StudyEvent::PomodoroPhaseChanged {
                server_id,
                new_phase: transition.new_phase,
                cycle_count: transition.cycle_count,
                phase_end: transition.phase_end,
                channel_id,
            });
            if let Some(voice_channel_id) = *timer.voice_channel_id() {
                self.notifier.request_voice(VoiceNotification {
                    voice_channel_id,
                    phase: transition.new_phase,
                });
            }
        }

        debug!(?report, "Pomodoro scan complete");
        report
    }
}
