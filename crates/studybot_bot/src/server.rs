use crate::BotMetrics;
use crate::api::{ApiState, create_router};
use crate::config::{BotSchedule, StudyBotConfig};
use crate::pomodoro::{PomodoroBot, PomodoroMessage};
use crate::rewards::{RewardBot, RewardMessage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use studybot_error::{ConfigError, StudyBotResult};
use studybot_session::SessionRegistry;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info, instrument};

/// Bot server that runs the reward and pomodoro actors.
pub struct StudyServer;

impl StudyServer {
    /// Starts both tick actors, their schedulers and the optional HTTP API.
    ///
    /// The first tick of each actor fires one full interval after start.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API listener cannot be bound.
    #[instrument(skip_all)]
    pub async fn start(
        config: &StudyBotConfig,
        registry: Arc<SessionRegistry>,
        metrics: BotMetrics,
    ) -> StudyBotResult<StudyServerHandle> {
        info!("Starting study server");
        let schedule = BotSchedule::from(config);

        let api = match &config.api {
            Some(api) => {
                let listener = tokio::net::TcpListener::bind(&api.bind).await.map_err(|e| {
                    ConfigError::new(format!("Failed to bind API on {}: {}", api.bind, e))
                })?;
                let local_addr = listener.local_addr().map_err(|e| {
                    ConfigError::new(format!("Failed to read API address: {}", e))
                })?;
                let router = create_router(ApiState::new(metrics.clone(), Arc::clone(&registry)));
                info!(%local_addr, "Metrics API listening");
                let handle = tokio::spawn(async move {
                    if let Err(e) = axum::serve(listener, router).await {
                        error!(error = %e, "Metrics API stopped");
                    }
                });
                Some((local_addr, handle))
            }
            None => None,
        };

        // Create channels
        let (reward_tx, reward_rx) = mpsc::channel(32);
        let (pomodoro_tx, pomodoro_rx) = mpsc::channel(32);

        // Spawn bot actors
        let reward_bot = RewardBot::new(Arc::clone(&registry), metrics.clone(), reward_rx);
        let pomodoro_bot = PomodoroBot::new(registry, metrics, pomodoro_rx);

        let reward_handle = tokio::spawn(async move {
            reward_bot.run().await;
        });
        let pomodoro_handle = tokio::spawn(async move {
            pomodoro_bot.run().await;
        });

        // Spawn schedulers
        let schedulers = vec![
            spawn_scheduler(
                "reward",
                schedule.reward_interval,
                reward_tx.clone(),
                || RewardMessage::Tick,
            ),
            spawn_scheduler(
                "pomodoro",
                schedule.pomodoro_scan_interval,
                pomodoro_tx.clone(),
                || PomodoroMessage::Scan,
            ),
        ];

        Ok(StudyServerHandle {
            reward_tx,
            pomodoro_tx,
            reward_handle,
            pomodoro_handle,
            schedulers,
            api,
        })
    }
}

fn spawn_scheduler<M, F>(
    name: &'static str,
    period: Duration,
    tx: mpsc::Sender<M>,
    message: F,
) -> JoinHandle<()>
where
    M: Send + 'static,
    F: Fn() -> M + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tx.send(message()).await.is_err() {
                error!(bot = name, "Bot channel closed");
                break;
            }
        }
    })
}

/// Running server returned by [`StudyServer::start`].
pub struct StudyServerHandle {
    reward_tx: mpsc::Sender<RewardMessage>,
    pomodoro_tx: mpsc::Sender<PomodoroMessage>,
    reward_handle: JoinHandle<()>,
    pomodoro_handle: JoinHandle<()>,
    schedulers: Vec<JoinHandle<()>>,
    api: Option<(SocketAddr, JoinHandle<()>)>,
}

impl StudyServerHandle {
    /// Address the metrics API is bound to, if one was configured.
    pub fn api_addr(&self) -> Option<SocketAddr> {
        self.api.as_ref().map(|(addr, _)| *addr)
    }

    /// Stops the schedulers and waits for both actors to finish their
    /// current tick.
    #[instrument(skip(self))]
    pub async fn shutdown(self) {
        info!("Stopping study server");

        for scheduler in &self.schedulers {
            scheduler.abort();
        }
        if let Some((_, api)) = &self.api {
            api.abort();
        }

        if self.reward_tx.send(RewardMessage::Shutdown).await.is_err() {
            error!("Reward bot already stopped");
        }
        if self.pomodoro_tx.send(PomodoroMessage::Shutdown).await.is_err() {
            error!("Pomodoro bot already stopped");
        }

        if let Err(e) = self.reward_handle.await {
            error!(error = %e, "Reward bot task failed");
        }
        if let Err(e) = self.pomodoro_handle.await {
            error!(error = %e, "Pomodoro bot task failed");
        }

        info!("Study server stopped");
    }
}
