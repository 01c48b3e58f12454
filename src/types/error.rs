use thiserror::Error;

/// Errors that abort a single evaluation. No effect is applied when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("tag evaluation aborted due to circular reference: {}", path.join(" -> "))]
    CircularTag { path: Vec<String> },
}

/// Errors raised by [`RulesEngineBuilder::build()`](crate::RulesEngineBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no effect parser configured")]
    MissingEffectParser,

    #[error("duplicate interesting number '{name}'")]
    DuplicateVariable { name: String },

    #[error("prefix '{prefix}' is reserved for built-in predicates")]
    ReservedPrefix { prefix: char },
}
