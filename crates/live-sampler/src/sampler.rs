//! Live Sampler Implementation

use crate::observer::SamplerObserver;
use crate::source::{RandomSampleSource, SampleSource};
use chrono::{DateTime, Local, Utc};
use dms::{AlertnessState, Classifier, MetricSample};
use rolling_history::{ChartSeries, DualHistoryPoint, HistoryPoint, RollingHistory};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Configuration for the live sampler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Time between samples in milliseconds (default: 2000)
    pub interval_ms: u64,
    /// Points kept per live chart (default: 20)
    pub window: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            window: rolling_history::LIVE_WINDOW,
        }
    }
}

impl SamplerConfig {
    /// Interval between samples
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Sampler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerPhase {
    Idle,
    Running,
}

/// A classified sample with its chart label
#[derive(Debug, Clone, Serialize)]
pub struct LiveReading {
    pub sample: MetricSample,
    pub state: AlertnessState,
    /// Local wall-clock label (HH:MM:SS)
    pub label: String,
}

/// Point-in-time copy of the sampler for rendering
#[derive(Debug, Clone, Serialize)]
pub struct LiveSnapshot {
    pub phase: SamplerPhase,
    pub current: Option<LiveReading>,
    pub perclos: Vec<HistoryPoint>,
    pub blinks_yawns: Vec<DualHistoryPoint>,
    pub samples_produced: u64,
}

struct Shared {
    phase: SamplerPhase,
    /// Bumped on every start/stop; a tick task only runs while its epoch is current
    epoch: u64,
    task: Option<JoinHandle<()>>,
    current: Option<LiveReading>,
    series: ChartSeries,
    source: Box<dyn SampleSource>,
    classifier: Classifier,
    observers: Vec<Arc<dyn SamplerObserver>>,
    samples_produced: u64,
}

impl Shared {
    /// Produce, classify, and append one sample
    fn tick(&mut self) {
        let sample = self.source.next_sample(Utc::now());
        let state = self.classifier.classify(&sample);
        let label = format_local_label(sample.timestamp);

        self.series.push(
            label.clone(),
            sample.perclos,
            f64::from(sample.blink_count),
            f64::from(sample.yawn_count),
        );
        self.samples_produced += 1;
        metrics::counter!("live_samples_total", "state" => state.to_string()).increment(1);
        debug!(
            "Live sample {} at {}: perclos={:.1} blinks={} yawns={} -> {}",
            self.samples_produced, label, sample.perclos, sample.blink_count, sample.yawn_count, state
        );

        let reading = LiveReading {
            sample,
            state,
            label,
        };
        for observer in &self.observers {
            observer.on_reading(&reading, &self.series);
        }
        self.current = Some(reading);
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns false once the task's epoch is stale
fn tick_if_current(shared: &Mutex<Shared>, epoch: u64) -> bool {
    let mut shared = lock(shared);
    if shared.epoch != epoch || shared.phase != SamplerPhase::Running {
        return false;
    }
    shared.tick();
    true
}

/// Periodic sampler feeding the live PERCLOS and blink/yawn windows.
///
/// `start` and `stop` are idempotent: calling either outside its legal
/// phase does nothing. Must be started from within a Tokio runtime.
pub struct LiveSampler {
    config: SamplerConfig,
    shared: Arc<Mutex<Shared>>,
}

impl LiveSampler {
    /// Create a sampler over the simulated feed
    pub fn new(config: SamplerConfig, classifier: Classifier) -> Self {
        Self::with_source(config, classifier, RandomSampleSource::new())
    }

    /// Create a sampler over a custom feed
    pub fn with_source(
        config: SamplerConfig,
        classifier: Classifier,
        source: impl SampleSource + 'static,
    ) -> Self {
        let window = config.window;
        let shared = Shared {
            phase: SamplerPhase::Idle,
            epoch: 0,
            task: None,
            current: None,
            series: ChartSeries {
                perclos: RollingHistory::bounded(window),
                blinks_yawns: RollingHistory::bounded(window),
            },
            source: Box::new(source),
            classifier,
            observers: Vec::new(),
            samples_produced: 0,
        };

        info!(
            "Live sampler created (interval {} ms, window {})",
            config.interval_ms, window
        );

        Self {
            config,
            shared: Arc::new(Mutex::new(shared)),
        }
    }

    /// Register an observer for readings and lifecycle events
    pub fn subscribe(&self, observer: Arc<dyn SamplerObserver>) {
        lock(&self.shared).observers.push(observer);
    }

    /// Start sampling: one sample now, then one per interval.
    ///
    /// Returns false if already running, or if called outside a Tokio
    /// runtime (the sampler then stays idle).
    pub fn start(&self) -> bool {
        let mut shared = lock(&self.shared);
        if shared.phase == SamplerPhase::Running {
            debug!("Live sampler already running");
            return false;
        }
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!("Live sampler not started: {}", err);
                return false;
            }
        };

        shared.phase = SamplerPhase::Running;
        shared.epoch += 1;
        let epoch = shared.epoch;

        for observer in &shared.observers {
            observer.on_started();
        }
        shared.tick();

        let period = self.config.interval();
        let weak = Arc::downgrade(&self.shared);
        shared.task = Some(runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                if !tick_if_current(&shared, epoch) {
                    break;
                }
            }
        }));

        info!("Live sampling started (every {:?})", period);
        true
    }

    /// Stop sampling and clear both live windows.
    ///
    /// No tick lands after this returns. Returns false if already idle.
    pub fn stop(&self) -> bool {
        let mut shared = lock(&self.shared);
        if shared.phase == SamplerPhase::Idle {
            debug!("Live sampler already idle");
            return false;
        }

        shared.phase = SamplerPhase::Idle;
        shared.epoch += 1;
        if let Some(task) = shared.task.take() {
            task.abort();
        }
        shared.series.clear();

        for observer in &shared.observers {
            observer.on_stopped();
        }

        info!(
            "Live sampling stopped after {} samples",
            shared.samples_produced
        );
        true
    }

    pub fn phase(&self) -> SamplerPhase {
        lock(&self.shared).phase
    }

    pub fn is_running(&self) -> bool {
        self.phase() == SamplerPhase::Running
    }

    /// Latest classified reading
    pub fn current(&self) -> Option<LiveReading> {
        lock(&self.shared).current.clone()
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        let shared = lock(&self.shared);
        LiveSnapshot {
            phase: shared.phase,
            current: shared.current.clone(),
            perclos: shared.series.perclos.to_vec(),
            blinks_yawns: shared.series.blinks_yawns.to_vec(),
            samples_produced: shared.samples_produced,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }
}

impl Drop for LiveSampler {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.shared).task.take() {
            task.abort();
        }
    }
}

/// Chart label for a live tick: local wall clock, 24-hour HH:MM:SS
pub fn format_local_label(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}
