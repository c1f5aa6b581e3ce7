//! The two rules driving the actuators and the order they are checked in

use std::fmt;

use serde::Serialize;

use crate::set::ConditionSet;

/// Which rule a condition set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Off,
    On,
}

impl RuleKind {
    /// Lit state the actuators are driven to when this rule is reached
    pub fn target(self) -> bool {
        matches!(self, RuleKind::On)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleKind::Off => "OFF",
            RuleKind::On => "ON",
        })
    }
}

/// OFF and ON condition sets, parsed once at startup
///
/// Serialises as `{"off": [...], "on": [...], "off_first": bool}` with the
/// raw specifications as configured.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlRules {
    pub off: ConditionSet,
    pub on: ConditionSet,
    pub off_first: bool,
}

impl ControlRules {
    pub fn new(off: ConditionSet, on: ConditionSet, off_first: bool) -> Self {
        Self { off, on, off_first }
    }

    /// Parse both rule sets from raw specifications
    pub fn parse<S: AsRef<str>>(off: &[S], on: &[S], off_first: bool) -> Self {
        Self::new(
            ConditionSet::parse(off.iter().map(|s| s.as_ref().to_string())),
            ConditionSet::parse(on.iter().map(|s| s.as_ref().to_string())),
            off_first,
        )
    }

    pub fn set(&self, kind: RuleKind) -> &ConditionSet {
        match kind {
            RuleKind::Off => &self.off,
            RuleKind::On => &self.on,
        }
    }

    /// Rules in evaluation order: ON then OFF, or OFF then ON in off-first mode
    pub fn order(&self) -> [(RuleKind, &ConditionSet); 2] {
        if self.off_first {
            [(RuleKind::Off, &self.off), (RuleKind::On, &self.on)]
        } else {
            [(RuleKind::On, &self.on), (RuleKind::Off, &self.off)]
        }
    }
}
