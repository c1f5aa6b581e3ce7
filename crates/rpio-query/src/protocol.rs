//! Wire types

use chrono::{DateTime, Utc};
use rpio_condition::ControlRules;
use rpio_core::ActuatorState;
use rpio_state_store::StateSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Largest request the server reads from a connection
pub const MAX_REQUEST_BYTES: usize = 1024;

/// The only method the server answers
pub const METHOD_GET_STATUS: &str = "get_status";

/// A client request; members other than `method` are ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub method: String,
}

impl QueryRequest {
    pub fn get_status() -> Self {
        Self {
            method: METHOD_GET_STATUS.to_string(),
        }
    }

    /// Decode a request buffer
    pub fn decode(buf: &[u8]) -> QueryResult<Self> {
        serde_json::from_slice(buf).map_err(QueryError::MalformedRequest)
    }
}

/// Latest averaged sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub temperature: f64,
    pub humidity: f64,
    /// `None` until the first successful cycle
    pub last_updated: Option<DateTime<Utc>>,
}

/// Configured rules, reported as raw specifications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionReport {
    pub off: Vec<String>,
    pub on: Vec<String>,
    pub off_first: bool,
}

impl From<&ControlRules> for ConditionReport {
    fn from(rules: &ControlRules) -> Self {
        Self {
            off: rules.off.specs().to_vec(),
            on: rules.on.specs().to_vec(),
            off_first: rules.off_first,
        }
    }
}

/// Reply to `get_status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: StatusReport,
    pub condition: ConditionReport,
    pub led: Vec<ActuatorState>,
}

impl StatusResponse {
    pub fn new(snapshot: StateSnapshot, rules: &ControlRules) -> Self {
        Self {
            status: StatusReport {
                temperature: snapshot.sample.temperature,
                humidity: snapshot.sample.humidity,
                last_updated: snapshot.sample.last_updated,
            },
            condition: ConditionReport::from(rules),
            led: snapshot.actuators,
        }
    }

    pub fn encode(&self) -> QueryResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(QueryError::Encode)
    }
}
