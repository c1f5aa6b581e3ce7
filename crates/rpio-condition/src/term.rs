//! Predicate terms and their building blocks

use std::fmt;

use rpio_core::Sample;
use tracing::debug;

/// The sample field a term tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Temperature,
    Humidity,
}

impl Subject {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "t" | "temp" | "temperature" => Some(Subject::Temperature),
            "h" | "hum" | "humidity" => Some(Subject::Humidity),
            _ => None,
        }
    }

    /// Read this subject's value out of a sample
    pub fn value_of(self, sample: &Sample) -> f64 {
        match self {
            Subject::Temperature => sample.temperature,
            Subject::Humidity => sample.humidity,
        }
    }
}

/// Numeric comparison between the current value and the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparator {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Comparator::Eq),
            "gt" => Some(Comparator::Gt),
            "gte" => Some(Comparator::Gte),
            "lt" => Some(Comparator::Lt),
            "lte" => Some(Comparator::Lte),
            _ => None,
        }
    }

    /// `current <op> threshold`
    pub fn compare(self, current: f64, threshold: f64) -> bool {
        match self {
            Comparator::Eq => current == threshold,
            Comparator::Gt => current > threshold,
            Comparator::Gte => current >= threshold,
            Comparator::Lt => current < threshold,
            Comparator::Lte => current <= threshold,
        }
    }
}

/// Logic gate joining a term onto the result accumulated so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Joiner {
    #[default]
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
}

impl Joiner {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "and" => Some(Joiner::And),
            "or" => Some(Joiner::Or),
            "xor" => Some(Joiner::Xor),
            "nand" => Some(Joiner::Nand),
            "nor" => Some(Joiner::Nor),
            "xnor" => Some(Joiner::Xnor),
            _ => None,
        }
    }

    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Joiner::And => left && right,
            Joiner::Or => left || right,
            Joiner::Xor => left != right,
            Joiner::Nand => !(left && right),
            Joiner::Nor => !(left || right),
            Joiner::Xnor => left == right,
        }
    }
}

/// One parsed `subject:comparator:threshold[:joiner]` rule
///
/// Invalid pieces do not make parsing fail. An unknown subject makes the
/// term inert, while an unknown comparator or a non-numeric threshold makes
/// it evaluate to `false` whatever the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateTerm {
    subject: Option<Subject>,
    comparator: Option<Comparator>,
    threshold: Option<f64>,
    joiner: Joiner,
    rule: String,
    joiner_text: String,
}

impl PredicateTerm {
    /// Parse a colon-delimited specification
    ///
    /// Returns `None` unless the specification has exactly three or four
    /// fields. The three-field form joins with `and`.
    pub fn parse(spec: &str) -> Option<Self> {
        let fields: Vec<&str> = spec.split(':').collect();

        let (subject, comparator, threshold, joiner_text) = match fields.as_slice() {
            [s, c, t] => (*s, *c, *t, "and"),
            [s, c, t, j] => (*s, *c, *t, *j),
            _ => {
                debug!(spec, "Dropping condition with wrong field count");
                return None;
            }
        };

        let joiner = Joiner::parse(joiner_text).unwrap_or_else(|| {
            debug!(spec, joiner = joiner_text, "Unknown joiner, using 'and'");
            Joiner::And
        });

        Some(Self {
            subject: Subject::parse(subject),
            comparator: Comparator::parse(comparator),
            threshold: threshold.trim().parse::<f64>().ok(),
            joiner,
            rule: format!("{subject}:{comparator}:{threshold}"),
            joiner_text: joiner_text.to_string(),
        })
    }

    pub fn subject(&self) -> Option<Subject> {
        self.subject
    }

    pub fn comparator(&self) -> Option<Comparator> {
        self.comparator
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn joiner(&self) -> Joiner {
        self.joiner
    }

    /// Joiner as it was written (or `and` when omitted)
    pub fn joiner_text(&self) -> &str {
        &self.joiner_text
    }

    /// Test the term against a sample
    ///
    /// Returns `None` for an inert term (unknown subject).
    pub fn test(&self, sample: &Sample) -> Option<bool> {
        let current = self.subject?.value_of(sample);

        Some(match (self.comparator, self.threshold) {
            (Some(comparator), Some(threshold)) => comparator.compare(current, threshold),
            _ => false,
        })
    }
}

impl fmt::Display for PredicateTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rule)
    }
}
