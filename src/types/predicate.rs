use std::fmt;
use std::sync::Arc;

/// A pure boolean test over a host context.
///
/// Host predicates are produced by the prefix parsers and the default
/// predicate hook registered on [`RulesEngineBuilder`](crate::RulesEngineBuilder).
/// They must not mutate shared state: the engine is free to skip them,
/// reorder them, or reuse a cached tag result instead of calling them.
///
/// Any `Fn(&C) -> bool + Send + Sync` closure is a predicate.
pub trait Predicate<C>: Send + Sync {
    fn test(&self, ctx: &C) -> bool;
}

impl<C, F> Predicate<C> for F
where
    F: Fn(&C) -> bool + Send + Sync,
{
    fn test(&self, ctx: &C) -> bool {
        self(ctx)
    }
}

/// Comparison operators of the `(<var><op><const>)` predicate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gte,
    Lte,
    Neq,
    Gt,
    Lt,
    Eq,
}

impl CompareOp {
    /// Operators in the order they are searched for in a comparison body.
    /// Two-character operators come first since `>`, `<` and `=` are
    /// substrings of them.
    pub const SEARCH_ORDER: [CompareOp; 6] = [
        CompareOp::Gte,
        CompareOp::Lte,
        CompareOp::Neq,
        CompareOp::Gt,
        CompareOp::Lt,
        CompareOp::Eq,
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Eq => "=",
        }
    }

    #[must_use]
    pub fn apply(self, value: f64, constant: f64) -> bool {
        match self {
            CompareOp::Gte => value >= constant,
            CompareOp::Lte => value <= constant,
            CompareOp::Neq => value != constant,
            CompareOp::Gt => value > constant,
            CompareOp::Lt => value < constant,
            CompareOp::Eq => value == constant,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A compiled `(<var><op><const>)` predicate. The variable is resolved to its
/// position in the interesting-number array at parse time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Comparison {
    pub(crate) variable: usize,
    pub(crate) op: CompareOp,
    pub(crate) constant: f64,
}

impl Comparison {
    /// Missing entries read as NaN, so only `!=` can hold for them.
    pub(crate) fn test(&self, numbers: &[f64]) -> bool {
        let value = numbers.get(self.variable).copied().unwrap_or(f64::NAN);
        self.op.apply(value, self.constant)
    }
}

/// Parsed predicate. Built-in forms are closed variants; everything the host
/// understands is an opaque [`Predicate`] object.
pub(crate) enum Pred<C> {
    Domain(Box<dyn Predicate<C>>),
    Not(Arc<Pred<C>>),
    /// Index into the ruleset's tag table.
    Tag(usize),
    Compare(Comparison),
}

impl<C> fmt::Debug for Pred<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pred::Domain(_) => f.write_str("Domain(..)"),
            Pred::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Pred::Tag(id) => f.debug_tuple("Tag").field(id).finish(),
            Pred::Compare(cmp) => write!(f, "Compare(#{} {} {})", cmp.variable, cmp.op, cmp.constant),
        }
    }
}

/// One AND-group of predicates.
pub(crate) type Conjunction<C> = Vec<Arc<Pred<C>>>;
