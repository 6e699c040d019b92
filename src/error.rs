use thiserror::Error;

use crate::syntax::ParseError;

/// Failure of a whole-module compilation. There is no partial output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A type expression, union shape or reference outside the supported subset.
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("syntax error at {0}")]
    Syntax(#[from] ParseError),
}

impl CompileError {
    pub fn unsupported(what: impl Into<String>) -> Self {
        CompileError::UnsupportedConstruct(what.into())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, CompileError::UnsupportedConstruct(_))
    }
}
