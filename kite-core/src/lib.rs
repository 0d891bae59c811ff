//! Core compiler pipeline for the Kite language.
//!
//! The pipeline is roughly:
//!
//!   source .kite
//!     -> lexer     (tokens, one at a time)
//!     -> parser    (AST, one top-level primary at a time)
//!     -> codegen   (textual LLVM IR accumulated into a Module)
//!
//! Higher-level tools (the CLI and its build driver) should depend on
//! this crate rather than reimplementing the pipeline. Invoking the
//! backend toolchain (`llc`, the system C compiler) is deliberately not
//! part of this crate.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod ast;
pub mod lexer;
pub mod parser;

// ---------------------------------------------------------------------
// Back-end: IR model, lowering, and compile orchestration
// ---------------------------------------------------------------------

pub mod codegen;
pub mod compiler;
pub mod ir;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{CompileOutput, compile};
pub use error::CompileError;
