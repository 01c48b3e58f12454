mod error;
mod lexer;
mod parser;
mod predicate;

pub use error::{ParseError, ParseErrorKind, PredicateError};
pub(crate) use parser::Parser;
