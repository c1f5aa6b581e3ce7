//! Core types for rpioalert
//!
//! This crate provides the fundamental types shared by every other crate:
//! the per-probe [`Reading`], the averaged [`Sample`], the reported
//! [`ActuatorState`], and the two collaborator traits the daemon drives,
//! [`SensorDriver`] and [`OutputPin`].

mod actuator;
mod driver;
mod reading;
mod sample;

pub use actuator::ActuatorState;
pub use driver::{OutputPin, PinError, RawReading, SensorDriver, SensorError};
pub use reading::Reading;
pub use sample::{Sample, SampleError, SampleResult};

/// Normalised field carrying a probe's temperature
pub const FIELD_TEMPERATURE: &str = "internal_temperature";

/// Normalised field carrying a probe's relative humidity
pub const FIELD_HUMIDITY: &str = "internal_humidity";
