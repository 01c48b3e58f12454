use std::fmt;

use thiserror::Error;

/// A load failure, tagged with the 1-based line it was detected on.
///
/// Any parse error aborts the whole load; the previously active ruleset is
/// left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    line: usize,
    kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, kind: impl Into<ParseErrorKind>) -> Self {
        Self {
            line,
            kind: kind.into(),
        }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error on line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Predicate(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Structural problems in the rule text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("no arrow (\"->\") in rule line")]
    NoArrow,

    #[error("no effects for rule")]
    NoEffects,

    /// Message from the host effect parser.
    #[error("{0}")]
    Effect(String),

    #[error("illegal tag name: {0} (tag name must be purely alphanumeric)")]
    IllegalTagName(String),

    #[error("expected [ after tag name")]
    ExpectedBracket,

    #[error("duplicate tag \"{0}\"")]
    DuplicateTag(String),

    #[error("unexpected EOF, unclosed block for tag \"{0}\"")]
    UnclosedTag(String),

    #[error("\"]\" must appear at the end of a line")]
    MisplacedBracket,

    #[error("tag \"{0}\" has no predicates")]
    EmptyTag(String),

    #[error("tag referenced but never defined: \"{0}\"")]
    UndefinedTag(String),

    #[error(transparent)]
    Predicate(#[from] PredicateError),
}

/// A predicate token that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("negating nothing")]
    EmptyNegation,

    #[error("empty tag name")]
    EmptyTagName,

    #[error("unknown variable: \"{0}\"")]
    UnknownVariable(String),

    #[error("invalid number: \"{0}\"")]
    InvalidNumber(String),

    #[error("no comparison operator found in \"{0}\"")]
    NoOperator(String),

    #[error("unprefixed predicates unsupported: \"{0}\"")]
    Unprefixed(String),

    /// Message from a host predicate parser.
    #[error("{0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::new(3, ParseErrorKind::NoEffects);
        assert_eq!(err.to_string(), "error on line 3: no effects for rule");
    }

    #[test]
    fn predicate_errors_display_transparently() {
        let err = ParseError::new(7, PredicateError::UnknownVariable("depth".into()));
        assert_eq!(err.to_string(), "error on line 7: unknown variable: \"depth\"");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn accessors() {
        let err = ParseError::new(2, ParseErrorKind::DuplicateTag("night".into()));
        assert_eq!(err.line(), 2);
        assert_eq!(err.kind(), &ParseErrorKind::DuplicateTag("night".into()));
    }
}
