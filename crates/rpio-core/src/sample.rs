//! Aggregate sample averaged across all probes of one poll cycle

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reading::Reading;
use crate::{FIELD_HUMIDITY, FIELD_TEMPERATURE};

/// Result type for sample aggregation
pub type SampleResult<T> = Result<T, SampleError>;

/// Reasons a poll cycle produced no usable sample
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("sensor returned no readings")]
    NoReadings,

    #[error("no reading exposes '{field}'")]
    MissingField { field: &'static str },

    #[error("value '{value}' of '{field}' is not numeric")]
    InvalidValue { field: &'static str, value: String },
}

/// Mean temperature and humidity across the readings of one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub temperature: f64,
    pub humidity: f64,
}

impl Sample {
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Average every reading that exposes each field
    ///
    /// Fields are averaged independently. An exposed field without a value
    /// counts as `0`. The sample is only produced when at least one reading
    /// supplies temperature and at least one supplies humidity.
    pub fn aggregate(readings: &[Reading]) -> SampleResult<Self> {
        if readings.is_empty() {
            return Err(SampleError::NoReadings);
        }

        let temperature = Self::mean(readings, FIELD_TEMPERATURE)?;
        let humidity = Self::mean(readings, FIELD_HUMIDITY)?;

        Ok(Self {
            temperature,
            humidity,
        })
    }

    fn mean(readings: &[Reading], field: &'static str) -> SampleResult<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;

        for reading in readings.iter().filter(|r| r.has(field)) {
            sum += match reading.value(field) {
                Some(raw) => {
                    let invalid = || SampleError::InvalidValue {
                        field,
                        value: raw.to_string(),
                    };
                    // nan and inf parse, but cannot be published as JSON numbers
                    let value = raw.trim().parse::<f64>().map_err(|_| invalid())?;
                    if !value.is_finite() {
                        return Err(invalid());
                    }
                    value
                }
                None => 0.0,
            };
            count += 1;
        }

        if count == 0 {
            return Err(SampleError::MissingField { field });
        }

        Ok(sum / count as f64)
    }
}
