//! Compile TypeScript interfaces and type aliases into Joi schemas plus
//! matching type-guard functions.
//!
//! Pipeline: source text → [`syntax`] declarations → [`lower`] schema IR
//! → [`codegen`] module text. [`check`] evaluates the IR against JSON values.
pub mod syntax;
pub mod ir;
pub mod lower;
pub mod codegen;
pub mod compile;
pub mod check;
pub mod error;

pub use compile::{compile_declaration, compile_ir, compile_module, Options};
pub use error::CompileError;
