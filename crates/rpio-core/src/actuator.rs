//! Reported state of a single actuator

use serde::{Deserialize, Serialize};

/// Lit/unlit state of one addressable output
///
/// Serialises as `{"pin": 17, "state": true}`, the shape reported by the
/// query interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorState {
    /// Pin number addressing the output
    pub pin: u32,

    /// `true` when the output is lit
    pub state: bool,
}

impl ActuatorState {
    pub fn new(pin: u32, state: bool) -> Self {
        Self { pin, state }
    }

    /// Human readable label, e.g. `LED:17 ON`
    pub fn label(&self) -> String {
        format!("LED:{} {}", self.pin, if self.state { "ON" } else { "OFF" })
    }
}
