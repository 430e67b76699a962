use crate::BotMetrics;
use std::sync::Arc;
use studybot_session::SessionRegistry;
use tokio::sync::mpsc;
use tracing::{info, instrument};

/// Message types for the pomodoro bot.
#[derive(Debug)]
pub enum PomodoroMessage {
    /// Flip every timer whose phase has run out
    Scan,
    /// Shutdown the bot
    Shutdown,
}

/// Bot that advances pomodoro timers.
pub struct PomodoroBot {
    registry: Arc<SessionRegistry>,
    metrics: BotMetrics,
    rx: mpsc::Receiver<PomodoroMessage>,
}

impl PomodoroBot {
    /// Creates a new pomodoro bot.
    pub fn new(
        registry: Arc<SessionRegistry>,
        metrics: BotMetrics,
        rx: mpsc::Receiver<PomodoroMessage>,
    ) -> Self {
        Self {
            registry,
            metrics,
            rx,
        }
    }

    /// Runs the pomodoro bot loop until shutdown or the channel closes.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Pomodoro bot started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                PomodoroMessage::Scan => {
                    let report = self.registry.pomodoro_scan().await;
                    self.metrics.record_pomodoro_scan(&report);
                }
                PomodoroMessage::Shutdown => {
                    info!("Pomodoro bot shutting down");
                    break;
                }
            }
        }
    }
}
