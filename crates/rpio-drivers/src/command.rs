//! Sensor backed by an external reader program

use std::process::Command;

use rpio_core::{RawReading, SensorDriver, SensorError};
use serde_json::Value;
use tracing::trace;

/// Runs a reader program and decodes its stdout as JSON
///
/// The program must print either an array of objects (one per probe) or a
/// single object. Keys and values are passed through untouched; field
/// normalisation is done by [`Reading::from_raw`](rpio_core::Reading::from_raw).
#[derive(Debug, Clone)]
pub struct CommandSensor {
    program: String,
    args: Vec<String>,
}

impl CommandSensor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Decode a reader's stdout
    pub fn parse_output(stdout: &str) -> Result<Vec<RawReading>, SensorError> {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| SensorError::InvalidOutput(e.to_string()))?;

        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(SensorError::InvalidOutput(format!(
                        "expected an object per probe, got {other}"
                    ))),
                })
                .collect(),
            Value::Object(map) => Ok(vec![map]),
            other => Err(SensorError::InvalidOutput(format!(
                "expected an array of probes, got {other}"
            ))),
        }
    }
}

impl SensorDriver for CommandSensor {
    fn read(&mut self) -> Result<Vec<RawReading>, SensorError> {
        trace!(program = %self.program, args = ?self.args, "Running sensor reader");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| SensorError::Unavailable(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SensorError::CommandFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_output(&stdout)
    }
}
