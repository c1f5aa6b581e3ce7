//! Condition sets: the ordered terms of one ON or OFF rule

use std::fmt;

use rpio_core::Sample;
use serde::{Serialize, Serializer};

use crate::eval::{evaluate, Reach};
use crate::term::PredicateTerm;

/// An ordered, immutable sequence of predicate terms
///
/// The raw specifications are kept verbatim next to the parsed terms, so
/// malformed entries that were dropped from evaluation are still reported
/// as configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    terms: Vec<PredicateTerm>,
    specs: Vec<String>,
}

impl ConditionSet {
    /// Parse every specification once; malformed ones are dropped
    pub fn parse<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let specs: Vec<String> = specs.into_iter().map(Into::into).collect();
        let terms = specs
            .iter()
            .filter_map(|spec| PredicateTerm::parse(spec))
            .collect();

        Self { terms, specs }
    }

    pub fn terms(&self) -> &[PredicateTerm] {
        &self.terms
    }

    /// Specifications exactly as configured
    pub fn specs(&self) -> &[String] {
        &self.specs
    }

    /// `true` when no term survived parsing
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Evaluate against a sample
    pub fn evaluate(&self, sample: &Sample) -> Reach {
        evaluate(&self.terms, sample)
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("None");
        }

        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", term.joiner_text())?;
            }
            write!(f, "{term}")?;
        }

        Ok(())
    }
}

impl Serialize for ConditionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.specs.serialize(serializer)
    }
}
