//! Background refresh loop
//!
//! One tokio task per service runs the refresh job immediately on start and
//! then once per interval. Runs never overlap: the loop awaits each run before
//! waiting for the next tick. A run that panics is logged and the loop carries on.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::error::{Result, WeatherError};
use crate::provider::RefreshReport;

/// How long `stop` waits for an in-flight run before aborting it
pub const STOP_GRACE: Duration = Duration::from_secs(5);

/// The work executed on every tick
pub type RefreshJob = Arc<dyn Fn() -> BoxFuture<'static, RefreshReport> + Send + Sync>;

struct RunningLoop {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs a [`RefreshJob`] on a fixed interval with explicit start/stop
pub struct PollingService {
    name: String,
    interval: Duration,
    job: RefreshJob,
    running: Mutex<Option<RunningLoop>>,
}

impl PollingService {
    pub fn new(name: impl Into<String>, interval: Duration, job: RefreshJob) -> Result<Self> {
        if interval.is_zero() {
            return Err(WeatherError::Config(
                "Polling interval must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            name: name.into(),
            interval,
            job,
            running: Mutex::new(None),
        })
    }

    /// Start the loop; the first run happens immediately. No-op if already running.
    pub async fn start(&self) {
        let mut running = self.running.lock().await;
        if running.is_some() {
            warn!(service = %self.name, "Polling service is already running");
            return;
        }

        info!(
            service = %self.name,
            interval_secs = self.interval.as_secs(),
            "Starting polling service"
        );

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            self.name.clone(),
            self.interval,
            self.job.clone(),
            stop_rx,
        ));
        *running = Some(RunningLoop { stop_tx, handle });
    }

    /// Stop scheduling new runs and wait up to [`STOP_GRACE`] for an in-flight
    /// run to finish before aborting it. No-op if not running.
    pub async fn stop(&self) {
        let mut running = self.running.lock().await;
        let Some(mut active) = running.take() else {
            debug!(service = %self.name, "Polling service is not running");
            return;
        };

        info!(service = %self.name, "Stopping polling service");
        let _ = active.stop_tx.send(true);

        match tokio::time::timeout(STOP_GRACE, &mut active.handle).await {
            Ok(Ok(())) => debug!(service = %self.name, "Polling loop stopped"),
            Ok(Err(e)) => warn!(service = %self.name, error = %e, "Polling loop ended abnormally"),
            Err(_) => {
                warn!(
                    service = %self.name,
                    grace_secs = STOP_GRACE.as_secs(),
                    "Refresh still running after grace period, aborting"
                );
                active.handle.abort();
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }
}

impl Drop for PollingService {
    fn drop(&mut self) {
        if let Some(active) = self.running.get_mut().take() {
            active.handle.abort();
        }
    }
}

async fn run_loop(
    name: String,
    period: Duration,
    job: RefreshJob,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = ticker.tick() => {}
        }

        debug!(service = %name, "Starting scheduled cache update");
        match AssertUnwindSafe(async { job().await }).catch_unwind().await {
            Ok(report) => debug!(
                service = %name,
                succeeded = report.succeeded,
                failed = report.failed,
                "Completed scheduled cache update"
            ),
            Err(_) => error!(service = %name, "Scheduled cache update panicked"),
        }
    }

    debug!(service = %name, "Polling loop exited");
}
