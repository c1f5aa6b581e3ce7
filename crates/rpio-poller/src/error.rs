//! Error types for the control loop

use rpio_actuator::ActuatorError;
use rpio_core::{SampleError, SensorError};
use thiserror::Error;

/// Result type for a single poll cycle
pub type CycleResult<T> = Result<T, CycleError>;

/// Reasons a poll cycle was skipped
///
/// Every variant is recovered from: the loop logs it and waits for the
/// next tick.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("sensor read failed: {0}")]
    Sensor(#[from] SensorError),

    #[error("no usable sample: {0}")]
    Sample(#[from] SampleError),

    #[error("actuation failed: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("sensor worker stopped")]
    WorkerStopped,
}

/// Errors that prevent the poller from starting
#[derive(Debug, Error)]
pub enum PollerError {
    #[error("failed to start sensor worker: {0}")]
    SpawnWorker(#[source] std::io::Error),
}
