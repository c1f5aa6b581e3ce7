//! In-memory drivers
//!
//! Used by the test suites of every crate above this one, and handy for
//! running the daemon without hardware.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rpio_core::{OutputPin, PinError, RawReading, SensorDriver, SensorError};
use serde_json::Value;

/// Shared view of a [`MemoryPin`], usable after the pin was moved away
#[derive(Debug, Clone, Default)]
pub struct PinProbe {
    lit: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

impl PinProbe {
    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::SeqCst)
    }

    /// Number of `on`/`off` calls the pin received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

/// An output pin that only lives in memory
#[derive(Debug)]
pub struct MemoryPin {
    number: u32,
    probe: PinProbe,
    fail_writes: bool,
}

impl MemoryPin {
    /// A pin that starts unlit
    pub fn new(number: u32) -> Self {
        Self {
            number,
            probe: PinProbe::default(),
            fail_writes: false,
        }
    }

    /// A pin that starts lit
    pub fn lit(number: u32) -> Self {
        let pin = Self::new(number);
        pin.probe.lit.store(true, Ordering::SeqCst);
        pin
    }

    /// Make every `on`/`off` call fail
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn probe(&self) -> PinProbe {
        self.probe.clone()
    }

    fn set(&mut self, lit: bool) -> Result<(), PinError> {
        self.probe.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes {
            return Err(PinError::Write {
                pin: self.number,
                source: io::Error::new(io::ErrorKind::Other, "simulated write failure"),
            });
        }

        self.probe.lit.store(lit, Ordering::SeqCst);
        Ok(())
    }
}

impl OutputPin for MemoryPin {
    fn number(&self) -> u32 {
        self.number
    }

    fn is_lit(&self) -> bool {
        self.probe.is_lit()
    }

    fn on(&mut self) -> Result<(), PinError> {
        self.set(true)
    }

    fn off(&mut self) -> Result<(), PinError> {
        self.set(false)
    }

    fn release(&mut self) -> Result<(), PinError> {
        self.probe.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}

type Script = Arc<Mutex<VecDeque<Result<Vec<RawReading>, SensorError>>>>;

/// A sensor answering from a scripted queue
///
/// Clones share the queue, so a test can keep one handle and push new
/// outcomes while the other is owned by the poller. Once the queue is
/// drained every read returns an empty list.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSensor {
    script: Script,
    reads: Arc<AtomicUsize>,
}

impl ScriptedSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one read returning `readings`
    pub fn push_readings(&self, readings: Vec<RawReading>) {
        self.push(Ok(readings));
    }

    /// Queue one read failing with `error`
    pub fn push_failure(&self, error: SensorError) {
        self.push(Err(error));
    }

    /// Queue one read with a single probe reporting temperature and humidity
    pub fn push_sample(&self, temperature: f64, humidity: f64) {
        self.push_readings(vec![Self::probe(temperature, humidity)]);
    }

    /// Number of reads served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// A raw probe in the reader's native key format
    pub fn probe(temperature: f64, humidity: f64) -> RawReading {
        let mut probe = RawReading::new();
        probe.insert(
            "Internal Temperature".to_string(),
            Value::String(temperature.to_string()),
        );
        probe.insert(
            "Internal Humidity".to_string(),
            Value::String(humidity.to_string()),
        );
        probe
    }

    fn push(&self, outcome: Result<Vec<RawReading>, SensorError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }
}

impl SensorDriver for ScriptedSensor {
    fn read(&mut self) -> Result<Vec<RawReading>, SensorError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let mut script = self
            .script
            .lock()
            .map_err(|_| SensorError::Unavailable("script poisoned".to_string()))?;

        script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
