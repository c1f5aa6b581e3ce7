//! The recurring sample → evaluate → actuate task

use std::sync::Arc;
use std::time::Duration;

use rpio_actuator::{Actuation, Transition};
use rpio_condition::{ControlRules, Reach, RuleKind};
use rpio_core::{Reading, Sample, SensorDriver};
use rpio_state_store::SharedStateStore;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, instrument, trace};

use crate::error::{CycleResult, PollerError};
use crate::worker::SensorWorker;

/// Pause between two poll cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What a completed cycle did
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// The sample published to the store
    pub sample: Sample,
    /// Rules evaluated, in evaluation order
    pub evaluated: Vec<(RuleKind, Reach)>,
    /// The rule that was reached and the outputs it switched
    pub acted: Option<(RuleKind, Vec<Transition>)>,
}

/// The control loop
///
/// Cycles are strictly sequential. A cycle that fails at any step leaves
/// the store untouched and the loop simply waits for the next tick.
pub struct SensorPoller {
    store: SharedStateStore,
    rules: Arc<ControlRules>,
    worker: SensorWorker,
    interval: Duration,
}

impl SensorPoller {
    /// Create a poller, moving `driver` onto its worker thread
    pub fn new<D: SensorDriver>(
        store: SharedStateStore,
        rules: Arc<ControlRules>,
        driver: D,
    ) -> Result<Self, PollerError> {
        Ok(Self {
            store,
            rules,
            worker: SensorWorker::spawn(driver)?,
            interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the pause between cycles
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one complete cycle
    ///
    /// The sensor is read without the store lock. Aggregation, evaluation
    /// and actuation all happen under it, so readers only ever see a
    /// finished cycle.
    #[instrument(level = "debug", skip(self))]
    pub async fn run_cycle(&self) -> CycleResult<CycleReport> {
        let readings: Vec<Reading> = self
            .worker
            .read()
            .await?
            .into_iter()
            .map(Reading::from_raw)
            .collect();

        let mut state = self.store.lock().await;

        let sample = Sample::aggregate(&readings)?;
        state.record_sample(sample);

        let mut report = CycleReport {
            sample,
            evaluated: Vec::with_capacity(2),
            acted: None,
        };

        for (kind, set) in self.rules.order() {
            let reach = set.evaluate(&sample);
            debug!(
                "{} : {}, T:{}, H:{}, Reach:{}",
                kind, set, sample.temperature, sample.humidity, reach
            );
            report.evaluated.push((kind, reach));

            if let Actuation::Driven(transitions) =
                state.actuators_mut().apply(reach, kind.target())?
            {
                report.acted = Some((kind, transitions));
                break;
            }
        }

        Ok(report)
    }

    /// Poll until `shutdown` fires or its sender is dropped
    ///
    /// Shutdown is only observed between cycles; an in-flight cycle always
    /// completes. The worker thread is joined before returning.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(interval = ?self.interval, "Starting sensor poller");

        loop {
            if !matches!(shutdown.try_recv(), Err(TryRecvError::Empty)) {
                break;
            }

            match self.run_cycle().await {
                Ok(report) => trace!(?report, "Poll cycle complete"),
                Err(e) => debug!(error = %e, "Poll cycle skipped"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.recv() => break,
            }
        }

        self.worker.shutdown().await;
        info!("Sensor poller stopped");
    }
}
