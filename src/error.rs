use thiserror::Error;

use crate::parse::ParseError;

/// Errors from loading a rules file.
///
/// Returned by [`RulesEngine::load_rules_file()`](crate::RulesEngine::load_rules_file)
/// and [`RulesEngine::reload_rules()`](crate::RulesEngine::reload_rules).
#[derive(Debug, Error)]
pub enum RulesError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no rules file has been set")]
    NoRulesFile,
}
