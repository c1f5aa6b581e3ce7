//! Sensor poller for rpioalert
//!
//! This crate provides the control loop tying everything together:
//!
//! ```text
//! CYCLE = READ (worker thread) → AGGREGATE → EVALUATE → ACTUATE → SLEEP
//! ```
//!
//! - [`SensorWorker`] - the single thread allowed to block on the sensor
//! - [`SensorPoller`] - the recurring task driving one cycle per interval

mod error;
mod poller;
mod worker;

pub use error::{CycleError, CycleResult, PollerError};
pub use poller::{CycleReport, SensorPoller, DEFAULT_POLL_INTERVAL};
pub use worker::SensorWorker;
