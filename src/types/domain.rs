use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::effect::Effect;
use super::predicate::Predicate;
use super::variables::VariableRegistry;

/// Parses the text of a host predicate. Errors are plain messages; the parser
/// adds the line number.
pub(crate) type PredicateParser<C> =
    Box<dyn Fn(&str) -> Result<Box<dyn Predicate<C>>, String> + Send + Sync>;

pub(crate) type EffectParser<C> =
    Box<dyn Fn(&str) -> Result<Vec<Box<dyn Effect<C>>>, String> + Send + Sync>;

pub(crate) type NumberSource<C> = Box<dyn Fn(&C) -> Vec<f64> + Send + Sync>;

/// Everything the host contributes to the rule language. Fixed once the
/// engine is built.
pub(crate) struct Domain<C> {
    pub(crate) prefixes: HashMap<char, PredicateParser<C>>,
    pub(crate) fallback: Option<PredicateParser<C>>,
    pub(crate) effects: EffectParser<C>,
    pub(crate) slots: BTreeSet<i32>,
    pub(crate) variables: VariableRegistry,
    pub(crate) numbers: Option<NumberSource<C>>,
    pub(crate) default_rules: String,
}

impl<C> Domain<C> {
    /// The interesting numbers for one evaluation.
    pub(crate) fn numbers(&self, ctx: &C) -> Vec<f64> {
        self.numbers.as_ref().map_or_else(Vec::new, |f| f(ctx))
    }
}

impl<C> fmt::Debug for Domain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prefixes: Vec<char> = self.prefixes.keys().copied().collect();
        prefixes.sort_unstable();
        f.debug_struct("Domain")
            .field("prefixes", &prefixes)
            .field("fallback", &self.fallback.is_some())
            .field("slots", &self.slots)
            .field("variables", &self.variables)
            .finish()
    }
}
