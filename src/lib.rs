//! An embeddable priority rule engine.
//!
//! Rules are written in a small line-oriented language and loaded at runtime:
//!
//! ```text
//! # <level> <predicate>... -> <effect>...
//! 5 /2 -> 1
//! 0 /3 -> 2
//!
//! # a tag is an OR of AND-groups, referenced as %name
//! round [ /10, /25 ]
//! 9 %round (it<1000) -> @round
//! ```
//!
//! The host supplies the vocabulary through [`RulesEngineBuilder`]: parsers
//! for its predicate and effect tokens, the slots an evaluation fills, and
//! the numbers `(var op const)` comparisons read. [`RulesEngine::act()`]
//! then walks the rules from the highest level down and applies, for every
//! slot, the effect of the first satisfied rule that claims it.

mod compile;
mod engine;
mod error;
mod evaluate;
mod parse;
mod source;
mod types;

pub use engine::{RulesEngine, RulesEngineBuilder};
pub use error::RulesError;
pub use parse::{ParseError, ParseErrorKind, PredicateError};
pub use types::{
    effect, CompareOp, ConfigError, Effect, EvalError, EvaluationReport, FnEffect, Predicate,
    Ruleset, SlotVerdict, VariableRegistry,
};
