//! TypeScript declaration parsing.
//!
//! Source text is parsed by swc. Interfaces and type aliases are read back in
//! full; every other top-level statement is recorded by kind and line only.
pub mod ast;
mod parser;

pub use parser::Parser;

use ast::Declaration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { line, column, message: message.into() }
    }
}

/// Parse a whole source file into its top-level declarations, in file order.
pub fn parse_module(src: &str) -> Result<Vec<Declaration>, ParseError> {
    Parser::new().parse_module(src)
}

/// A lone type expression, read through a throwaway alias.
#[cfg(test)]
pub(crate) fn parse_type(src: &str) -> Result<ast::TypeExpr, ParseError> {
    match parse_module(&format!("type T = {src};"))?.pop() {
        Some(Declaration::TypeAlias(alias)) => Ok(alias.ty),
        other => Err(ParseError::new(1, 1, format!("not a type: {other:?}"))),
    }
}
