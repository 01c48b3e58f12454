use std::sync::Arc;

use crate::types::{CompareOp, Comparison, Pred, VariableRegistry};

use super::error::PredicateError;
use super::parser::Parser;

impl<C> Parser<'_, C> {
    /// Parse a predicate token, sharing one instance per distinct source text.
    pub(super) fn predicate(
        &mut self,
        source: &str,
        line: usize,
    ) -> Result<Arc<Pred<C>>, PredicateError> {
        if let Some(cached) = self.cache.get(source) {
            return Ok(Arc::clone(cached));
        }
        let predicate = Arc::new(self.generate(source, line)?);
        self.cache.insert(source.to_owned(), Arc::clone(&predicate));
        Ok(predicate)
    }

    fn generate(&mut self, source: &str, line: usize) -> Result<Pred<C>, PredicateError> {
        let mut chars = source.chars();
        let prefix = chars.next();
        let rest = chars.as_str();

        match prefix {
            Some('!') if rest.is_empty() => Err(PredicateError::EmptyNegation),
            Some('!') => Ok(Pred::Not(self.predicate(rest, line)?)),
            Some('%') if rest.is_empty() => Err(PredicateError::EmptyTagName),
            Some('%') => Ok(Pred::Tag(self.tags.reference(rest, line))),
            Some('(') => {
                let body = rest.strip_suffix(')').unwrap_or(rest);
                comparison(body, &self.domain.variables).map(Pred::Compare)
            }
            _ => self.host_predicate(prefix, source, rest),
        }
    }

    fn host_predicate(
        &self,
        prefix: Option<char>,
        source: &str,
        rest: &str,
    ) -> Result<Pred<C>, PredicateError> {
        let parsed = match prefix.and_then(|c| self.domain.prefixes.get(&c)) {
            Some(parse) => parse(rest),
            None => match &self.domain.fallback {
                Some(fallback) => fallback(source),
                None => return Err(PredicateError::Unprefixed(source.to_owned())),
            },
        };
        parsed.map(Pred::Domain).map_err(PredicateError::Rejected)
    }
}

/// Compile the body of a `(<var><op><const>)` predicate.
pub(crate) fn comparison(
    body: &str,
    variables: &VariableRegistry,
) -> Result<Comparison, PredicateError> {
    for op in CompareOp::SEARCH_ORDER {
        if let Some((left, right)) = split_on(body, op.symbol()) {
            let variable = variables
                .get(left)
                .ok_or_else(|| PredicateError::UnknownVariable(left.to_owned()))?;
            let constant: f64 = right
                .parse()
                .map_err(|_| PredicateError::InvalidNumber(right.to_owned()))?;
            return Ok(Comparison {
                variable,
                op,
                constant,
            });
        }
    }
    Err(PredicateError::NoOperator(body.to_owned()))
}

/// Split at the last occurrence of `symbol` that leaves both sides non-empty.
fn split_on<'a>(body: &'a str, symbol: &str) -> Option<(&'a str, &'a str)> {
    body.rmatch_indices(symbol)
        .map(|(at, _)| (&body[..at], &body[at + symbol.len()..]))
        .find(|(left, right)| !left.is_empty() && !right.is_empty())
}
