use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use crate::errors::PersistenceError;
use crate::persistence::{format_duration, AverageSink};
use crate::prober::LatencyProber;
use crate::window::RollingWindow;

/// Run-wide counters: when measurement started and how many ticks have
/// completed. Written only by the scheduler, read concurrently by report
/// handlers.
#[derive(Debug)]
pub struct RunStats {
    started_at: Instant,
    total_ticks: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_ticks: AtomicU64::new(0),
        }
    }

    pub fn record_tick(&self) {
        self.total_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks.load(Ordering::Relaxed)
    }

    pub fn measurement_duration(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Drives the probe -> window -> average -> persist pipeline on a fixed
/// interval. Ticks are strictly sequential; an overrunning tick defers the
/// next one instead of overlapping it.
pub struct ProbeScheduler {
    prober: Arc<dyn LatencyProber>,
    sink: Arc<dyn AverageSink>,
    stats: Arc<RunStats>,
    window: RollingWindow,
    interval: Duration,
}

impl ProbeScheduler {
    pub fn new(
        prober: Arc<dyn LatencyProber>,
        sink: Arc<dyn AverageSink>,
        stats: Arc<RunStats>,
        interval: Duration,
    ) -> Self {
        Self {
            prober,
            sink,
            stats,
            window: RollingWindow::new(),
            interval,
        }
    }

    /// Runs until the stop signal flips to `true` (or its sender is
    /// dropped). The first tick fires one full interval after this call.
    /// A persistence write failure aborts the loop; probe failures do not.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) -> Result<(), PersistenceError> {
        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            url = %self.prober.target(),
            interval_secs = self.interval.as_secs(),
            "latency measurement loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await?,
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        info!("stop signal received, measurement loop exiting");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// One pipeline pass. Public so a harness can run an exact number of
    /// ticks without the timer.
    pub async fn tick(&mut self) -> Result<(), PersistenceError> {
        let sample = self.prober.probe().await;
        info!(
            url = %self.prober.target(),
            latency = %format_duration(sample.elapsed),
            ok = sample.ok,
            "latency measured"
        );

        self.window.append(sample.elapsed);
        if let Some(average) = self.window.average() {
            info!(average = %format_duration(average), "rolling average updated");
            self.sink.save(average).await?;
        }
        self.stats.record_tick();
        Ok(())
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }
}
