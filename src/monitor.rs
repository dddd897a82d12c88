//! The Monitor: probe loop, window resets and the snapshot read path.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pingwatch_types::Snapshot;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::classify::ThresholdTable;
use crate::config::MonitorConfig;
use crate::error::{ConfigError, MonitorError};
use crate::probe::{PingProber, ProbeOutcome, Prober};
use crate::sink::ErrorSink;
use crate::stats::StatsWindow;
use crate::window::WindowClock;

/// How long a prober may overrun the configured timeout before the loop
/// gives up on it and counts a timeout. Longer than the default
/// [`PingProber`] grace, so `ping` gets to report its own outcome first.
const PROBE_GRACE: Duration = Duration::from_secs(2);

/// Lifecycle of a [`Monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Constructed, probe loop not started.
    Idle,
    /// Probe loop active.
    Running,
    /// Stop requested; once `stop()` has returned the loop has exited.
    Stopped,
}

/// State shared between the probe loop and readers.
#[derive(Debug)]
struct Shared {
    config: MonitorConfig,
    stats: StatsWindow,
    clock: Mutex<WindowClock>,
}

impl Shared {
    /// Reset the statistics if the current window has run its course.
    fn roll_window(&self, now: Instant) {
        let mut clock = self.clock.lock();
        if clock.due_for_reset(now) {
            self.stats.reset();
            clock.mark_reset(now);
            debug!(
                target_host = %self.config.target,
                generation = self.stats.snapshot().generation,
                "statistics window reset"
            );
        }
    }
}

#[derive(Debug)]
enum Lifecycle {
    Idle,
    Running {
        stop_tx: watch::Sender<bool>,
        done_rx: watch::Receiver<()>,
    },
    Stopped {
        done_rx: Option<watch::Receiver<()>>,
    },
}

/// Periodically probes a target and keeps rolling-window loss statistics.
///
/// The probe loop runs as a tokio task. Readers call [`snapshot()`](Self::snapshot)
/// from any thread at their own cadence; a read never waits on a probe.
///
/// # Example
///
/// ```rust,no_run
/// use pingwatch::Monitor;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let monitor = Monitor::builder()
///         .target("1.1.1.1")
///         .interval(Duration::from_secs(4))
///         .window(Duration::from_secs(300))
///         .build()?;
///
///     monitor.start()?;
///
///     tokio::time::sleep(Duration::from_secs(20)).await;
///     let snapshot = monitor.snapshot();
///     println!("{} lost, {}", snapshot.statistics.unreachable, snapshot.severity);
///
///     monitor.stop().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Monitor {
    shared: Arc<Shared>,
    prober: Arc<dyn Prober>,
    sink: ErrorSink,
    lifecycle: Mutex<Lifecycle>,
}

impl Monitor {
    /// Create a monitor from a configuration and a prober.
    ///
    /// The configuration is validated here, so a monitor that exists can
    /// always be started.
    pub fn new(config: MonitorConfig, prober: Arc<dyn Prober>) -> Result<Self, ConfigError> {
        Self::with_sink(config, prober, ErrorSink::default())
    }

    fn with_sink(
        config: MonitorConfig,
        prober: Arc<dyn Prober>,
        sink: ErrorSink,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let clock = WindowClock::new(config.window, Instant::now());
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                stats: StatsWindow::new(),
                clock: Mutex::new(clock),
            }),
            prober,
            sink,
            lifecycle: Mutex::new(Lifecycle::Idle),
        })
    }

    /// Create a builder for configuring the monitor.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Start the probe loop on the current tokio runtime.
    ///
    /// Starting a running monitor is a no-op. A stopped monitor cannot be
    /// restarted.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) -> Result<(), MonitorError> {
        let mut lifecycle = self.lifecycle.lock();
        match *lifecycle {
            Lifecycle::Running { .. } => return Ok(()),
            Lifecycle::Stopped { .. } => return Err(MonitorError::AlreadyStopped),
            Lifecycle::Idle => {}
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(());

        // The first window starts now, not at construction.
        *self.shared.clock.lock() = WindowClock::new(self.shared.config.window, Instant::now());

        tokio::spawn(run_probe_loop(
            self.shared.clone(),
            self.prober.clone(),
            self.sink.clone(),
            stop_rx,
            done_tx,
        ));

        *lifecycle = Lifecycle::Running { stop_tx, done_rx };
        info!(
            target_host = %self.shared.config.target,
            interval = ?self.shared.config.interval,
            window = ?self.shared.config.window,
            "monitor started"
        );
        Ok(())
    }

    /// Stop the probe loop and wait for it to exit.
    ///
    /// An in-flight probe is abandoned rather than awaited. When this returns,
    /// no further statistics updates will happen. Safe to call from several
    /// tasks at once, and on a monitor that was never started.
    pub async fn stop(&self) {
        let (stop_tx, done_rx) = {
            let mut lifecycle = self.lifecycle.lock();
            let previous = std::mem::replace(&mut *lifecycle, Lifecycle::Stopped { done_rx: None });
            match previous {
                Lifecycle::Idle => {
                    debug!("monitor stopped before it was started");
                    return;
                }
                Lifecycle::Running { stop_tx, done_rx } => {
                    *lifecycle = Lifecycle::Stopped {
                        done_rx: Some(done_rx.clone()),
                    };
                    (Some(stop_tx), done_rx)
                }
                Lifecycle::Stopped { done_rx: None } => return,
                Lifecycle::Stopped {
                    done_rx: Some(done_rx),
                } => {
                    *lifecycle = Lifecycle::Stopped {
                        done_rx: Some(done_rx.clone()),
                    };
                    (None, done_rx)
                }
            }
        };

        if let Some(stop_tx) = stop_tx {
            let _ = stop_tx.send(true);
        }

        // Resolves once the loop task drops its sender, i.e. has exited.
        let mut done_rx = done_rx;
        while done_rx.changed().await.is_ok() {}

        info!(target_host = %self.shared.config.target, "monitor stopped");
    }

    /// Take a point-in-time copy of the window statistics, classified
    /// against the threshold table.
    pub fn snapshot(&self) -> Snapshot {
        let config = &self.shared.config;
        let (window, duration, age) = {
            let clock = self.shared.clock.lock();
            (
                self.shared.stats.snapshot(),
                clock.window_duration(),
                clock.elapsed(Instant::now()),
            )
        };

        Snapshot::builder()
            .target(config.target.clone())
            .statistics(window.statistics)
            .severity(config.thresholds.classify(window.statistics.loss_percent))
            .window(window.generation, duration, age)
            .build()
    }

    pub fn state(&self) -> MonitorState {
        match *self.lifecycle.lock() {
            Lifecycle::Idle => MonitorState::Idle,
            Lifecycle::Running { .. } => MonitorState::Running,
            Lifecycle::Stopped { .. } => MonitorState::Stopped,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.shared.config
    }
}

/// The probe loop. Exits when a stop is signalled or the monitor is dropped.
async fn run_probe_loop(
    shared: Arc<Shared>,
    prober: Arc<dyn Prober>,
    sink: ErrorSink,
    mut stop_rx: watch::Receiver<bool>,
    _done_tx: watch::Sender<()>,
) {
    let config = &shared.config;
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // A closed channel means the Monitor was dropped; treat it as a stop.
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = ticker.tick() => {}
        }

        shared.roll_window(Instant::now());

        let probe = tokio::time::timeout(
            config.timeout + PROBE_GRACE,
            prober.probe(&config.target, config.timeout, config.packet_size),
        );
        let outcome = tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            outcome = probe => outcome.unwrap_or_else(|_| {
                debug!(target_host = %config.target, "prober overran its timeout");
                ProbeOutcome::Timeout
            }),
        };

        match outcome {
            ProbeOutcome::Error(error) => sink.report(&config.target, error),
            outcome => {
                shared.stats.record(&outcome);
            }
        }
    }

    debug!(target_host = %config.target, "probe loop exited");
}

/// Builder for configuring a Monitor.
#[derive(Debug, Default)]
pub struct MonitorBuilder {
    config: MonitorConfig,
    prober: Option<Arc<dyn Prober>>,
    sink: ErrorSink,
}

impl MonitorBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all settings at once, e.g. with a loaded [`MonitorConfig`].
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the host name or address to probe.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    /// Set the time between probes.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Set how long to wait for each reply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the payload size in bytes.
    pub fn packet_size(mut self, packet_size: u32) -> Self {
        self.config.packet_size = packet_size;
        self
    }

    /// Set how long statistics accumulate before being reset.
    pub fn window(mut self, window: Duration) -> Self {
        self.config.window = window;
        self
    }

    pub fn thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Use a custom prober instead of the system `ping`.
    pub fn prober(mut self, prober: impl Prober + 'static) -> Self {
        self.prober = Some(Arc::new(prober));
        self
    }

    /// Set where probe issuance failures are reported.
    ///
    /// Defaults to logging only.
    pub fn error_sink(mut self, sink: ErrorSink) -> Self {
        self.sink = sink;
        self
    }

    /// Validate the settings and build the monitor.
    pub fn build(self) -> Result<Monitor, ConfigError> {
        let prober = self
            .prober
            .unwrap_or_else(|| Arc::new(PingProber::new()));
        Monitor::with_sink(self.config, prober, self.sink)
    }
}
