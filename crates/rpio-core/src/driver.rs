//! Collaborator traits for the sensor and the actuator outputs
//!
//! Both traits are synchronous. The poller moves its [`SensorDriver`] onto a
//! dedicated worker thread; [`OutputPin`] calls are cheap and happen while
//! the state store lock is held.

use thiserror::Error;

/// One probe's raw field/value snapshot, as handed over by a sensor driver
pub type RawReading = serde_json::Map<String, serde_json::Value>;

/// Errors raised by a sensor driver
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SensorError {
    /// No device could be reached
    #[error("sensor unavailable: {0}")]
    Unavailable(String),

    /// The driver ran but reported a failure
    #[error("sensor command failed: {0}")]
    CommandFailed(String),

    /// The driver output could not be understood
    #[error("invalid sensor output: {0}")]
    InvalidOutput(String),
}

/// Errors raised by an output pin
#[derive(Debug, Error)]
pub enum PinError {
    #[error("failed to open pin {pin}: {source}")]
    Open {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write pin {pin}: {source}")]
    Write {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to release pin {pin}: {source}")]
    Release {
        pin: u32,
        #[source]
        source: std::io::Error,
    },
}

/// A blocking temperature/humidity sensor
///
/// A read may return any number of probes, including none.
pub trait SensorDriver: Send + 'static {
    fn read(&mut self) -> Result<Vec<RawReading>, SensorError>;
}

/// A binary output with observable lit/unlit state
pub trait OutputPin: Send {
    /// Pin number addressing this output
    fn number(&self) -> u32;

    /// Whether the output is currently lit
    fn is_lit(&self) -> bool;

    /// Light the output
    fn on(&mut self) -> Result<(), PinError>;

    /// Turn the output off
    fn off(&mut self) -> Result<(), PinError>;

    /// Give the underlying line back to the system
    fn release(&mut self) -> Result<(), PinError> {
        Ok(())
    }
}

impl<T: SensorDriver + ?Sized> SensorDriver for Box<T> {
    fn read(&mut self) -> Result<Vec<RawReading>, SensorError> {
        (**self).read()
    }
}
