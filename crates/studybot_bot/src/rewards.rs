use crate::BotMetrics;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use studybot_session::SessionRegistry;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Message types for the reward bot.
#[derive(Debug)]
pub enum RewardMessage {
    /// Grant one round of XP
    Tick,
    /// Shutdown the bot
    Shutdown,
}

/// Bot that periodically grants XP to everyone studying.
pub struct RewardBot {
    registry: Arc<SessionRegistry>,
    metrics: BotMetrics,
    rng: StdRng,
    rx: mpsc::Receiver<RewardMessage>,
}

impl RewardBot {
    /// Creates a new reward bot with an entropy-seeded generator.
    pub fn new(
        registry: Arc<SessionRegistry>,
        metrics: BotMetrics,
        rx: mpsc::Receiver<RewardMessage>,
    ) -> Self {
        Self::with_rng(registry, metrics, StdRng::from_entropy(), rx)
    }

    /// Creates a new reward bot drawing awards from `rng`.
    pub fn with_rng(
        registry: Arc<SessionRegistry>,
        metrics: BotMetrics,
        rng: StdRng,
        rx: mpsc::Receiver<RewardMessage>,
    ) -> Self {
        Self {
            registry,
            metrics,
            rng,
            rx,
        }
    }

    /// Runs the reward bot loop until shutdown or the channel closes.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Reward bot started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                RewardMessage::Tick => {
                    let report = self.registry.reward_tick(&mut self.rng).await;
                    if report.failures > 0 {
                        warn!(failures = report.failures, "Reward tick had storage failures");
                    }
                    self.metrics.record_reward_tick(&report);
                }
                RewardMessage::Shutdown => {
                    info!("Reward bot shutting down");
                    break;
                }
            }
        }
    }
}
