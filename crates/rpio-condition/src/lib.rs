//! Threshold conditions
//!
//! This crate turns textual condition specifications into structured
//! predicate terms and reduces a set of terms to a single [`Reach`] result
//! against a [`Sample`](rpio_core::Sample).
//!
//! # Condition language
//!
//! ```text
//! subject:comparator:threshold[:joiner]
//! ```
//!
//! - **subject**: `t`, `temp`, `temperature`, `h`, `hum`, `humidity`
//! - **comparator**: `eq`, `gt`, `gte`, `lt`, `lte`
//! - **joiner**: `and` (default), `or`, `xor`, `nand`, `nor`, `xnor`
//!
//! Terms are folded strictly left to right. There is no precedence and no
//! grouping: `a or b and c` means `(a or b) and c`.
//!
//! # Key Types
//!
//! - [`PredicateTerm`] - One parsed `subject:comparator:threshold` rule
//! - [`ConditionSet`] - Ordered terms forming one ON or OFF rule
//! - [`ControlRules`] - Both sets plus the evaluation order

pub mod eval;
pub mod rules;
pub mod set;
pub mod term;

pub use eval::{evaluate, Reach};
pub use rules::{ControlRules, RuleKind};
pub use set::ConditionSet;
pub use term::{Comparator, Joiner, PredicateTerm, Subject};
