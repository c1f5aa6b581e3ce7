//! Actuator controller
//!
//! The controller exclusively owns every [`OutputPin`] and is the only code
//! that switches them. Given a rule's [`Reach`] and the rule's target state
//! it performs the minimal set of transitions: outputs already in the
//! target state are never touched, so repeated calls are free.

use std::fmt;

use rpio_condition::Reach;
use rpio_core::{ActuatorState, OutputPin, PinError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Result type for actuator operations
pub type ActuatorResult<T> = Result<T, ActuatorError>;

/// Errors raised while switching outputs
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("failed to drive pin {pin}: {source}")]
    Drive {
        pin: u32,
        #[source]
        source: PinError,
    },

    #[error("failed to release pin {pin}: {source}")]
    Release {
        pin: u32,
        #[source]
        source: PinError,
    },
}

/// A single output state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub pin: u32,
    pub from: bool,
    pub to: bool,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |lit: bool| if lit { "ON" } else { "OFF" };
        write!(f, "LED:{} {}->{}", self.pin, label(self.from), label(self.to))
    }
}

/// What the controller did with a rule result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actuation {
    /// The rule was not reached (or undefined); nothing was touched
    NotReached,
    /// The rule was reached; holds the outputs that actually changed
    Driven(Vec<Transition>),
}

impl Actuation {
    pub fn is_reached(&self) -> bool {
        matches!(self, Actuation::Driven(_))
    }

    pub fn transitions(&self) -> &[Transition] {
        match self {
            Actuation::NotReached => &[],
            Actuation::Driven(transitions) => transitions,
        }
    }
}

/// Owner and sole writer of the actuator outputs
pub struct ActuatorController {
    pins: Vec<Box<dyn OutputPin>>,
}

impl ActuatorController {
    pub fn new(pins: Vec<Box<dyn OutputPin>>) -> Self {
        Self { pins }
    }

    /// Act on a rule result
    ///
    /// Only a [`Reach::Reached`] result drives the outputs towards `target`.
    pub fn apply(&mut self, reach: Reach, target: bool) -> ActuatorResult<Actuation> {
        if !reach.is_reached() {
            return Ok(Actuation::NotReached);
        }

        self.drive(target).map(Actuation::Driven)
    }

    /// Switch every output whose lit state differs from `target`
    ///
    /// Stops at the first driver failure; outputs switched before it keep
    /// their new state.
    pub fn drive(&mut self, target: bool) -> ActuatorResult<Vec<Transition>> {
        let mut transitions = Vec::new();

        for pin in self.pins.iter_mut() {
            let from = pin.is_lit();
            if from == target {
                continue;
            }

            let number = pin.number();
            let result = if target { pin.on() } else { pin.off() };
            result.map_err(|source| ActuatorError::Drive {
                pin: number,
                source,
            })?;

            let transition = Transition {
                pin: number,
                from,
                to: pin.is_lit(),
            };
            info!(pin = number, "{}", transition);
            transitions.push(transition);
        }

        if !transitions.is_empty() {
            debug!("Current state {}", self.describe());
        }

        Ok(transitions)
    }

    /// Force every output off
    pub fn reset(&mut self) -> ActuatorResult<Vec<Transition>> {
        self.drive(false)
    }

    /// Release every output, reporting the first failure
    pub fn release(&mut self) -> ActuatorResult<()> {
        let mut first_error = None;

        for pin in self.pins.iter_mut() {
            let number = pin.number();
            if let Err(source) = pin.release() {
                warn!(pin = number, error = %source, "Failed to release pin");
                first_error.get_or_insert(ActuatorError::Release {
                    pin: number,
                    source,
                });
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Snapshot of every output in configuration order
    pub fn states(&self) -> Vec<ActuatorState> {
        self.pins
            .iter()
            .map(|pin| ActuatorState::new(pin.number(), pin.is_lit()))
            .collect()
    }

    /// `LED:17 ON, LED:27 OFF`
    pub fn describe(&self) -> String {
        self.states()
            .iter()
            .map(ActuatorState::label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl fmt::Debug for ActuatorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActuatorController")
            .field("pins", &self.states())
            .finish()
    }
}
