//! Shared system state for rpioalert
//!
//! This crate provides the StateStore, the single source of truth for the
//! latest averaged sample and the actuator outputs. The poller is its only
//! writer; query handlers only take snapshots.
//!
//! One exclusive lock guards the sample *and* the actuator controller. The
//! poller holds it across aggregation, evaluation and actuation, so a
//! snapshot can never pair a new sample with stale actuator states.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rpio_actuator::ActuatorController;
use rpio_core::{ActuatorState, Sample};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

/// Everything guarded by the store lock
#[derive(Debug)]
pub struct SystemState {
    sample: Sample,
    last_updated: Option<DateTime<Utc>>,
    actuators: ActuatorController,
}

impl SystemState {
    fn new(actuators: ActuatorController) -> Self {
        Self {
            sample: Sample::default(),
            last_updated: None,
            actuators,
        }
    }

    /// Latest published sample (zeroes before the first good cycle)
    pub fn sample(&self) -> Sample {
        self.sample
    }

    /// When the sample was last published
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Publish a new sample
    pub fn record_sample(&mut self, sample: Sample) {
        trace!(
            temperature = sample.temperature,
            humidity = sample.humidity,
            "Recording sample"
        );
        self.sample = sample;
        self.last_updated = Some(Utc::now());
    }

    pub fn actuators(&self) -> &ActuatorController {
        &self.actuators
    }

    pub fn actuators_mut(&mut self) -> &mut ActuatorController {
        &mut self.actuators
    }

    /// Copy the state out
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            sample: SampleReport {
                temperature: self.sample.temperature,
                humidity: self.sample.humidity,
                last_updated: self.last_updated,
            },
            actuators: self.actuators.states(),
        }
    }
}

/// Published sample as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleReport {
    pub temperature: f64,
    pub humidity: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A consistent copy of the system state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub sample: SampleReport,
    pub actuators: Vec<ActuatorState>,
}

/// The lock-protected state store
#[derive(Debug)]
pub struct StateStore {
    state: Mutex<SystemState>,
}

impl StateStore {
    /// Create a store owning the actuator controller
    pub fn new(actuators: ActuatorController) -> Self {
        Self {
            state: Mutex::new(SystemState::new(actuators)),
        }
    }

    /// Take the exclusive lock
    ///
    /// Holders must not await anything slow (sensor I/O in particular)
    /// while the guard is alive.
    pub async fn lock(&self) -> MutexGuard<'_, SystemState> {
        self.state.lock().await
    }

    /// Copy the current state, holding the lock only for the copy
    pub async fn snapshot(&self) -> StateSnapshot {
        self.state.lock().await.snapshot()
    }
}

/// Shared handle to the store
pub type SharedStateStore = Arc<StateStore>;
