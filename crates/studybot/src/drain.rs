use studybot_interface::{EventReceivers, StudyEvent, VoiceNotification};
use tokio::task::JoinHandle;
use tracing::info;

/// Consumes outbound events and writes them to the log.
///
/// Used when no chat platform is attached, so the channels never fill up
/// and every level-up and phase change is still visible.
#[derive(Debug)]
pub struct LoggingEventDrain {
    receivers: EventReceivers,
}

impl LoggingEventDrain {
    /// Creates a drain over `receivers`.
    pub fn new(receivers: EventReceivers) -> Self {
        Self { receivers }
    }

    /// Spawns the drain. The task ends once every sender is gone.
    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }

    /// Logs events until every sender is gone and returns how many were seen.
    pub async fn run(mut self) -> usize {
        let mut seen = 0;
        let (mut events_open, mut voice_open) = (true, true);

        while events_open || voice_open {
            tokio::select! {
                event = self.receivers.events.recv(), if events_open => match event {
                    Some(event) => {
                        log_event(&event);
                        seen += 1;
                    }
                    None => events_open = false,
                },
                request = self.receivers.voice.recv(), if voice_open => match request {
                    Some(request) => {
                        log_voice(&request);
                        seen += 1;
                    }
                    None => voice_open = false,
                },
            }
        }
        seen
    }
}

fn log_event(event: &StudyEvent) {
    match event {
        StudyEvent::LevelUp {
            server_id,
            user_id,
            new_level,
            awarded_xp,
            channel_id,
        } => info!(
            server_id,
            user_id,
            new_level,
            awarded_xp,
            channel_id,
            "Level up"
        ),
        StudyEvent::PomodoroPhaseChanged {
            server_id,
            new_phase,
            cycle_count,
            phase_end,
            channel_id,
        } => info!(
            server_id,
            phase = %new_phase,
            cycle_count,
            phase_end = %phase_end,
            channel_id,
            "Pomodoro phase changed"
        ),
    }
}

fn log_voice(request: &VoiceNotification) {
    info!(
        voice_channel_id = request.voice_channel_id,
        phase = %request.phase,
        "Voice cue requested"
    );
}
