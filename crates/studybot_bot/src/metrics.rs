//! Metrics collection for the tick actors.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use studybot_session::{PomodoroScanReport, RewardTickReport};

/// Metrics collector for the reward and pomodoro actors.
///
/// Cloning shares the same counters.
#[derive(Debug, Clone)]
pub struct BotMetrics {
    inner: Arc<BotMetricsInner>,
}

#[derive(Debug)]
struct BotMetricsInner {
    // Reward tick counts
    reward_ticks: AtomicU64,
    xp_awards: AtomicU64,
    level_ups: AtomicU64,
    award_failures: AtomicU64,

    // Pomodoro scan counts
    pomodoro_scans: AtomicU64,
    phase_flips: AtomicU64,

    // Last completion timestamps
    reward_last_tick: parking_lot::Mutex<Option<Instant>>,
    pomodoro_last_scan: parking_lot::Mutex<Option<Instant>>,
}

impl Default for BotMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BotMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BotMetricsInner {
                reward_ticks: AtomicU64::new(0),
                xp_awards: AtomicU64::new(0),
                level_ups: AtomicU64::new(0),
                award_failures: AtomicU64::new(0),
                pomodoro_scans: AtomicU64::new(0),
                phase_flips: AtomicU64::new(0),
                reward_last_tick: parking_lot::Mutex::new(None),
                pomodoro_last_scan: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Records a finished reward tick.
    pub fn record_reward_tick(&self, report: &RewardTickReport) {
        let inner = &self.inner;
        inner.reward_ticks.fetch_add(1, Ordering::Relaxed);
        inner
            .xp_awards
            .fetch_add(report.awarded as u64, Ordering::Relaxed);
        inner
            .level_ups
            .fetch_add(report.level_ups as u64, Ordering::Relaxed);
        inner
            .award_failures
            .fetch_add(report.failures as u64, Ordering::Relaxed);
        *inner.reward_last_tick.lock() = Some(Instant::now());
    }

    /// Records a finished pomodoro scan.
    pub fn record_pomodoro_scan(&self, report: &PomodoroScanReport) {
        let inner = &self.inner;
        inner.pomodoro_scans.fetch_add(1, Ordering::Relaxed);
        inner
            .phase_flips
            .fetch_add(report.transitions as u64, Ordering::Relaxed);
        *inner.pomodoro_last_scan.lock() = Some(Instant::now());
    }

    /// Gets reward tick count.
    pub fn reward_ticks(&self) -> u64 {
        self.inner.reward_ticks.load(Ordering::Relaxed)
    }

    /// Gets XP award count.
    pub fn xp_awards(&self) -> u64 {
        self.inner.xp_awards.load(Ordering::Relaxed)
    }

    /// Gets level-up count.
    pub fn level_ups(&self) -> u64 {
        self.inner.level_ups.load(Ordering::Relaxed)
    }

    /// Gets failed award count.
    pub fn award_failures(&self) -> u64 {
        self.inner.award_failures.load(Ordering::Relaxed)
    }

    /// Gets pomodoro scan count.
    pub fn pomodoro_scans(&self) -> u64 {
        self.inner.pomodoro_scans.load(Ordering::Relaxed)
    }

    /// Gets phase flip count.
    pub fn phase_flips(&self) -> u64 {
        self.inner.phase_flips.load(Ordering::Relaxed)
    }

    /// Gets time since the last reward tick finished.
    pub fn reward_time_since_tick(&self) -> Option<Duration> {
        self.inner
            .reward_last_tick
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Gets time since the last pomodoro scan finished.
    pub fn pomodoro_time_since_scan(&self) -> Option<Duration> {
        self.inner
            .pomodoro_last_scan
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Share of attempted awards that reached storage (0.0 - 1.0).
    pub fn award_success_rate(&self) -> f64 {
        let succeeded = self.xp_awards();
        let attempted = succeeded + self.award_failures();
        if attempted == 0 {
            return 1.0;
        }
        succeeded as f64 / attempted as f64
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rewards: RewardMetricSnapshot {
                ticks: self.reward_ticks(),
                awards: self.xp_awards(),
                level_ups: self.level_ups(),
                failures: self.award_failures(),
                seconds_since_tick: self.reward_time_since_tick().map(|d| d.as_secs()),
            },
            pomodoro: PomodoroMetricSnapshot {
                scans: self.pomodoro_scans(),
                flips: self.phase_flips(),
                seconds_since_scan: self.pomodoro_time_since_scan().map(|d| d.as_secs()),
            },
            award_success_rate: self.award_success_rate(),
        }
    }
}

/// Serializable snapshot of bot metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Reward actor metrics
    pub rewards: RewardMetricSnapshot,
    /// Pomodoro actor metrics
    pub pomodoro: PomodoroMetricSnapshot,
    /// Share of awards that reached storage
    pub award_success_rate: f64,
}

/// Serializable snapshot of reward actor metrics.
#[derive(Debug, Clone, Serialize)]
pub struct RewardMetricSnapshot {
    /// Ticks completed
    pub ticks: u64,
    /// XP awards written
    pub awards: u64,
    /// Awards that crossed a level threshold
    pub level_ups: u64,
    /// Awards that failed in storage
    pub failures: u64,
    /// Seconds since the last tick finished
    pub seconds_since_tick: Option<u64>,
}

/// Serializable snapshot of pomodoro actor metrics.
#[derive(Debug, Clone, Serialize)]
pub struct PomodoroMetricSnapshot {
    /// Scans completed
    pub scans: u64,
    /// Phase flips performed
    pub flips: u64,
    /// Seconds since the last scan finished
    pub seconds_since_scan: Option<u64>,
}
