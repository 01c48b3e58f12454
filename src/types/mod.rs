mod domain;
mod effect;
mod error;
mod evaluation_report;
mod predicate;
mod rule;
mod ruleset;
mod variables;
mod verdict;

pub(crate) use domain::{Domain, EffectParser, NumberSource, PredicateParser};
pub use effect::{effect, Effect, FnEffect};
pub use error::{ConfigError, EvalError};
pub use evaluation_report::EvaluationReport;
pub(crate) use predicate::{Comparison, Conjunction, Pred};
pub use predicate::{CompareOp, Predicate};
pub(crate) use rule::Rule;
pub(crate) use ruleset::Tag;
pub use ruleset::Ruleset;
pub use variables::VariableRegistry;
pub use verdict::SlotVerdict;
