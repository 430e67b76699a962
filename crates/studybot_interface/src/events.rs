//! Outbound notifications.
//!
//! The core never waits on the chat platform. Events are pushed onto
//! unbounded channels and a closed receiver only produces a debug log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studybot_core::{ChannelId, Phase, ServerId, UserId};
use tokio::sync::mpsc;
use tracing::debug;

/// Notification for the chat platform to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyEvent {
    /// A participant crossed a level threshold during a reward tick
    LevelUp {
        /// Server the session runs in
        server_id: ServerId,
        /// User who levelled up
        user_id: UserId,
        /// Level reached
        new_level: i64,
        /// XP granted by the tick
        awarded_xp: i64,
        /// Channel to announce in
        channel_id: ChannelId,
    },
    /// A pomodoro timer moved to a new phase
    PomodoroPhaseChanged {
        /// Server the session runs in
        server_id: ServerId,
        /// Phase the timer moved into
        new_phase: Phase,
        /// Work phases completed so far
        cycle_count: u32,
        /// Scheduled end of the new phase
        phase_end: DateTime<Utc>,
        /// Channel to announce in
        channel_id: ChannelId,
    },
}

/// Request to play a phase cue in a voice channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceNotification {
    /// Channel to play the cue in
    pub voice_channel_id: ChannelId,
    /// Phase the cue announces
    pub phase: Phase,
}

/// Receiving ends handed to the chat platform adapter.
#[derive(Debug)]
pub struct EventReceivers {
    /// Level-ups and phase changes
    pub events: mpsc::UnboundedReceiver<StudyEvent>,
    /// Voice cue requests
    pub voice: mpsc::UnboundedReceiver<VoiceNotification>,
}

/// Fire-and-forget sender for outbound notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    events: Option<mpsc::UnboundedSender<StudyEvent>>,
    voice: Option<mpsc::UnboundedSender<VoiceNotification>>,
}

impl Notifier {
    /// Creates a notifier together with its receivers.
    pub fn channel() -> (Self, EventReceivers) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (voice_tx, voice_rx) = mpsc::unbounded_channel();
        (
            Self {
                events: Some(events_tx),
                voice: Some(voice_tx),
            },
            EventReceivers {
                events: events_rx,
                voice: voice_rx,
            },
        )
    }

    /// A notifier that drops everything.
    pub fn disconnected() -> Self {
        Self {
            events: None,
            voice: None,
        }
    }

    /// Sends an event to the platform, ignoring a closed receiver.
    pub fn emit(&self, event: StudyEvent) {
        let Some(tx) = &self.events else {
            return;
        };
        if let Err(e) = tx.send(event) {
            debug!(event = ?e.0, "Event receiver closed, dropping event");
        }
    }

    /// Asks the platform to play a voice cue, ignoring any failure.
    pub fn request_voice(&self, request: VoiceNotification) {
        let Some(tx) = &self.voice else {
            return;
        };
        if let Err(e) = tx.send(request) {
            debug!(request = ?e.0, "Voice receiver closed, dropping cue");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::disconnected()
    }
}
