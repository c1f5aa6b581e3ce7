//! Condition evaluation logic
//!
//! A set of terms is reduced to one boolean by a left-to-right fold: the
//! first active term seeds the result (its own joiner is ignored), every
//! later term is combined into it with that term's joiner. Inert terms are
//! skipped entirely and do not consume a joiner slot.

use std::fmt;

use rpio_core::Sample;
use tracing::trace;

use crate::term::PredicateTerm;

/// Outcome of evaluating a condition set against a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// The condition holds
    Reached,
    /// The condition does not hold
    NotReached,
    /// No term was active (empty set or every subject unknown)
    Undefined,
}

impl Reach {
    /// Whether actuation may proceed
    ///
    /// `Undefined` fails closed and never triggers actuation.
    pub fn is_reached(self) -> bool {
        matches!(self, Reach::Reached)
    }
}

impl From<Option<bool>> for Reach {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Reach::Reached,
            Some(false) => Reach::NotReached,
            None => Reach::Undefined,
        }
    }
}

impl fmt::Display for Reach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reach::Reached => "reached",
            Reach::NotReached => "not reached",
            Reach::Undefined => "undefined",
        })
    }
}

/// Fold `terms` against `sample`
pub fn evaluate(terms: &[PredicateTerm], sample: &Sample) -> Reach {
    let mut result: Option<bool> = None;

    for term in terms {
        let Some(outcome) = term.test(sample) else {
            trace!(term = %term, "Skipping inert term");
            continue;
        };

        result = Some(match result {
            None => outcome,
            Some(acc) => term.joiner().apply(acc, outcome),
        });
    }

    result.into()
}
