use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;

use tracing::debug;

use crate::evaluate::{self, Resolution};
use crate::parse::{ParseError, Parser};
use crate::types::{
    ConfigError, Domain, Effect, EffectParser, EvalError, EvaluationReport, NumberSource,
    Predicate, PredicateParser, Ruleset, VariableRegistry,
};

/// Prefixes the rule language claims for itself: negation, tag reference and
/// numeric comparison.
const RESERVED_PREFIXES: [char; 3] = ['!', '%', '('];

/// Builder for a [`RulesEngine`].
///
/// The host registers how its predicate and effect tokens are parsed, which
/// slots an evaluation fills, and which numbers comparisons may read. Only
/// the effect parser is required.
///
/// # Example
///
/// ```
/// use slotrules::{effect, RulesEngine};
///
/// let engine = RulesEngine::<i64>::builder()
///     .predicate('/', |n: &str| {
///         n.parse::<i64>().map(|n| move |x: &i64| x.checked_rem(n) == Some(0))
///     })
///     .slots([0])
///     .effects(|add: &str| add.parse::<i64>().map(|n| [effect(0, move |x: &mut i64| *x += n)]))
///     .build()
///     .unwrap();
///
/// engine.load_rules_raw("5 /2 -> 1\n0 /3 -> 2").unwrap();
///
/// let mut n = 6;
/// engine.act(&mut n).unwrap();
/// assert_eq!(n, 7);
/// ```
pub struct RulesEngineBuilder<C> {
    prefixes: HashMap<char, PredicateParser<C>>,
    fallback: Option<PredicateParser<C>>,
    effects: Option<EffectParser<C>>,
    slots: BTreeSet<i32>,
    variables: Vec<String>,
    numbers: Option<NumberSource<C>>,
    default_rules: String,
}

impl<C: 'static> Default for RulesEngineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> RulesEngineBuilder<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefixes: HashMap::new(),
            fallback: None,
            effects: None,
            slots: BTreeSet::new(),
            variables: Vec::new(),
            numbers: None,
            default_rules: String::new(),
        }
    }

    /// Parse tokens starting with `prefix`. The parser receives the token
    /// without its prefix.
    ///
    /// Registering the same prefix twice keeps the later parser.
    #[must_use]
    pub fn predicate<F, P, E>(mut self, prefix: char, parse: F) -> Self
    where
        F: Fn(&str) -> Result<P, E> + Send + Sync + 'static,
        P: Predicate<C> + 'static,
        E: fmt::Display,
    {
        self.prefixes.insert(prefix, predicate_parser(parse));
        self
    }

    /// Parse tokens whose first character matches no registered prefix. The
    /// parser receives the whole token.
    #[must_use]
    pub fn default_predicate<F, P, E>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<P, E> + Send + Sync + 'static,
        P: Predicate<C> + 'static,
        E: fmt::Display,
    {
        self.fallback = Some(predicate_parser(parse));
        self
    }

    /// Slots an evaluation tries to fill. Effects on other slots are never
    /// applied.
    #[must_use]
    pub fn slots(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.slots.extend(ids);
        self
    }

    /// Turn one effect token into the effects it stands for.
    #[must_use]
    pub fn effects<F, I, E>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<I, E> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Effect<C> + 'static,
        E: fmt::Display,
    {
        self.effects = Some(Box::new(
            move |token: &str| -> Result<Vec<Box<dyn Effect<C>>>, String> {
                parse(token)
                    .map(|effects| {
                        effects
                            .into_iter()
                            .map(|e| Box::new(e) as Box<dyn Effect<C>>)
                            .collect()
                    })
                    .map_err(|err| err.to_string())
            },
        ));
        self
    }

    /// Name the interesting numbers and how to compute them. `extract` must
    /// return one value per name, in the same order; missing values compare
    /// as NaN.
    #[must_use]
    pub fn numbers<I, S, F>(mut self, names: I, extract: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&C) -> Vec<f64> + Send + Sync + 'static,
    {
        self.variables = names.into_iter().map(Into::into).collect();
        self.numbers = Some(Box::new(extract));
        self
    }

    /// Text written to a rules file that does not exist yet.
    #[must_use]
    pub fn default_rules(mut self, text: impl Into<String>) -> Self {
        self.default_rules = text.into();
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no effect parser was set, a number name
    /// repeats, or a predicate prefix collides with a built-in one.
    pub fn build(self) -> Result<RulesEngine<C>, ConfigError> {
        let effects = self.effects.ok_or(ConfigError::MissingEffectParser)?;
        if let Some(prefix) = RESERVED_PREFIXES
            .into_iter()
            .find(|p| self.prefixes.contains_key(p))
        {
            return Err(ConfigError::ReservedPrefix { prefix });
        }

        let mut variables = VariableRegistry::new();
        for name in &self.variables {
            if variables.register(name).is_none() {
                return Err(ConfigError::DuplicateVariable { name: name.clone() });
            }
        }

        Ok(RulesEngine::new(Domain {
            prefixes: self.prefixes,
            fallback: self.fallback,
            effects,
            slots: self.slots,
            variables,
            numbers: self.numbers,
            default_rules: self.default_rules,
        }))
    }
}

fn predicate_parser<C, F, P, E>(parse: F) -> PredicateParser<C>
where
    C: 'static,
    F: Fn(&str) -> Result<P, E> + Send + Sync + 'static,
    P: Predicate<C> + 'static,
    E: fmt::Display,
{
    Box::new(move |text: &str| {
        parse(text)
            .map(|p| Box::new(p) as Box<dyn Predicate<C>>)
            .map_err(|err| err.to_string())
    })
}

/// Priority rule engine over host contexts of type `C`.
///
/// Holds the host configuration and the active [`Ruleset`]. Loading a new
/// ruleset swaps it in atomically; evaluations already running keep the
/// snapshot they started with. Share across threads with `Arc<RulesEngine<C>>`.
pub struct RulesEngine<C> {
    pub(crate) domain: Domain<C>,
    active: RwLock<Arc<Ruleset<C>>>,
    rules_file: Mutex<Option<PathBuf>>,
}

impl<C: 'static> RulesEngine<C> {
    #[must_use]
    pub fn builder() -> RulesEngineBuilder<C> {
        RulesEngineBuilder::new()
    }
}

impl<C> RulesEngine<C> {
    fn new(domain: Domain<C>) -> Self {
        Self {
            domain,
            active: RwLock::new(Arc::new(Ruleset::new(Vec::new(), Vec::new()))),
            rules_file: Mutex::new(None),
        }
    }

    /// Parse `text` and make it the active ruleset. Returns the number of
    /// rules loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on the first malformed line. The previously
    /// active ruleset stays in place.
    pub fn load_rules_raw(&self, text: &str) -> Result<usize, ParseError> {
        let ruleset = match Parser::new(&self.domain).parse(text) {
            Ok(ruleset) => ruleset,
            Err(err) => {
                debug!(%err, "rules rejected");
                return Err(err);
            }
        };
        #[cfg(feature = "fingerprint")]
        let ruleset = Ruleset {
            source_hash: Some(blake3::hash(text.as_bytes())),
            ..ruleset
        };

        let count = ruleset.len();
        debug!(rules = count, tags = ruleset.tags.len(), "rules loaded");
        *self
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(ruleset);
        Ok(count)
    }

    /// Number of rules in the active ruleset.
    #[must_use]
    pub fn count(&self) -> usize {
        self.ruleset().len()
    }

    /// Snapshot of the active ruleset.
    #[must_use]
    pub fn ruleset(&self) -> Arc<Ruleset<C>> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Interesting numbers available to `(var op const)` predicates.
    #[must_use]
    pub fn variables(&self) -> &VariableRegistry {
        &self.domain.variables
    }

    /// Evaluate the active ruleset against `ctx` and apply the winning
    /// effect of every filled slot, in ascending slot order.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if a tag refers to itself. `ctx` is left
    /// untouched in that case.
    pub fn act(&self, ctx: &mut C) -> Result<(), EvalError> {
        let ruleset = self.ruleset();
        let resolution = self.resolve(&ruleset, ctx)?;
        resolution.buffer.apply(ctx);
        Ok(())
    }

    /// Like [`act()`](Self::act), and report which rule filled each slot.
    ///
    /// # Errors
    ///
    /// See [`act()`](Self::act).
    pub fn act_detailed(&self, ctx: &mut C) -> Result<EvaluationReport, EvalError> {
        let start = Instant::now();
        let ruleset = self.ruleset();
        let resolution = self.resolve(&ruleset, ctx)?;
        resolution.buffer.apply(ctx);
        Ok(EvaluationReport::new(
            resolution.buffer.verdicts(&ruleset.rules),
            resolution.examined,
            start.elapsed(),
        ))
    }

    /// Resolve slots for `ctx` without applying any effect.
    ///
    /// # Errors
    ///
    /// See [`act()`](Self::act).
    pub fn explain(&self, ctx: &C) -> Result<EvaluationReport, EvalError> {
        let start = Instant::now();
        let ruleset = self.ruleset();
        let resolution = self.resolve(&ruleset, ctx)?;
        Ok(EvaluationReport::new(
            resolution.buffer.verdicts(&ruleset.rules),
            resolution.examined,
            start.elapsed(),
        ))
    }

    fn resolve<'r>(
        &'r self,
        ruleset: &'r Ruleset<C>,
        ctx: &C,
    ) -> Result<Resolution<'r, C>, EvalError> {
        let numbers = self.domain.numbers(ctx);
        evaluate::resolve(ruleset, &self.domain.slots, ctx, &numbers)
            .inspect_err(|err| debug!(%err, "evaluation aborted"))
    }

    pub(crate) fn rules_file(&self) -> MutexGuard<'_, Option<PathBuf>> {
        self.rules_file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C> fmt::Debug for RulesEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulesEngine")
            .field("domain", &self.domain)
            .field("active", &self.ruleset())
            .field("rules_file", &*self.rules_file())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::effect;

    fn builder() -> RulesEngineBuilder<i64> {
        RulesEngine::builder()
            .predicate('/', |n: &str| {
                n.parse::<i64>().map(|n| move |x: &i64| x.checked_rem(n) == Some(0))
            })
            .slots([0])
            .effects(|n: &str| n.parse::<i64>().map(|n| [effect(0, move |x: &mut i64| *x += n)]))
    }

    #[test]
    fn build_requires_effect_parser() {
        let err = RulesEngine::<i64>::builder().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingEffectParser);
    }

    #[test]
    fn reserved_prefixes_are_rejected() {
        for prefix in RESERVED_PREFIXES {
            let err = builder()
                .predicate(prefix, |_: &str| Ok::<_, String>(|_: &i64| true))
                .build()
                .unwrap_err();
            assert_eq!(err, ConfigError::ReservedPrefix { prefix });
        }
    }

    #[test]
    fn duplicate_number_names_are_rejected() {
        let err = builder()
            .numbers(["it", "sq", "it"], |x: &i64| vec![*x as f64])
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateVariable { name: "it".into() });
    }

    #[test]
    fn divisibility_example() {
        let engine = builder().build().unwrap();
        assert_eq!(engine.load_rules_raw("5 /2 -> 1\n0 /3 -> 2").unwrap(), 2);
        let results: Vec<i64> = [6, 9, 5]
            .into_iter()
            .map(|mut n| {
                engine.act(&mut n).unwrap();
                n
            })
            .collect();
        assert_eq!(results, [7, 11, 5]);
    }

    #[test]
    fn failed_load_keeps_previous_ruleset() {
        let engine = builder().build().unwrap();
        engine.load_rules_raw("1 /2 -> 1").unwrap();
        assert!(engine.load_rules_raw("1 /2 -> 1\n2 a ->").is_err());
        assert_eq!(engine.count(), 1);
    }

    #[test]
    fn explain_does_not_mutate() {
        let engine = builder().build().unwrap();
        engine.load_rules_raw("3 /2 -> 10").unwrap();
        let report = engine.explain(&4).unwrap();
        let verdict = report.verdict(0).unwrap();
        assert_eq!((verdict.level(), verdict.line()), (3, 1));
        assert_eq!(report.examined(), 1);
    }

    #[test]
    fn act_detailed_applies_and_reports() {
        let engine = builder().build().unwrap();
        engine.load_rules_raw("2 /5 -> 1\n1 /2 -> 100").unwrap();
        let mut n = 4;
        let report = engine.act_detailed(&mut n).unwrap();
        assert_eq!(n, 104);
        assert_eq!(report.verdict(0).map(|v| v.line()), Some(2));
        assert_eq!(report.examined(), 2);
    }

    #[test]
    fn degenerate_divisors_do_not_panic() {
        let engine = builder().build().unwrap();
        engine.load_rules_raw("2 /0 -> 1\n1 /-1 -> 2").unwrap();
        let mut n = 5;
        engine.act(&mut n).unwrap();
        assert_eq!(n, 7);

        let mut min = i64::MIN;
        engine.act(&mut min).unwrap();
        assert_eq!(min, i64::MIN);
    }

    #[test]
    fn empty_engine_does_nothing() {
        let engine = builder().build().unwrap();
        let mut n = 8;
        engine.act(&mut n).unwrap();
        assert_eq!(n, 8);
        assert_eq!(engine.count(), 0);
    }
}
