//! # arrai
//!
//! arrai is a tree-walking interpreter for a minimalist array-oriented
//! language whose only runtime datum is an array of 32-bit signed
//! integers. The language has user-defined functions, fixed-size and
//! growable arrays with a minimum-length contract, elementwise
//! arithmetic, range slicing, method chaining, `if`/`else if`/`else`
//! chains, `for` and `while` loops, a small set of builtins, and a
//! module-inclusion directive (`use`).

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::evaluator::core::Context;

/// Defines the structure of parsed code.
///
/// This module declares the node types that represent the syntactic
/// structure of source code as a tree, plus the canonical printer that
/// renders any tree back to parseable text. The AST is built by the
/// parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines item, statement, and expression types for all language
///   constructs.
/// - Attaches source line numbers to nodes for error reporting.
/// - Renders nodes back to canonical source text.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while interpreting
/// code. It standardizes error reporting and carries detailed information
/// about failures, including line numbers for user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Integrates with the standard error traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, the value
/// model, and the scope chain to provide a complete runtime for the
/// language. It exposes the public API for interpreting programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, values.
/// - Provides entry points for running programs from text or disk.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities: checked numeric conversion and terminal access.
pub mod util;

/// Runs a program from source text with the given arguments.
///
/// A fresh [`Context`] writing to the process stdout is created, the
/// program is loaded (resolving `use` directives against the current
/// working directory), and `main` is invoked when defined.
///
/// # Errors
/// Returns the first lexing, parsing, or runtime error.
///
/// # Examples
/// ```
/// use arrai::run_program;
///
/// // A program whose main returns immediately: no error occurs.
/// let source = "fn main(_: [+]) -> [+] { return []; }";
/// assert!(run_program(source, &[]).is_ok());
///
/// // An undefined function is a runtime error.
/// let source = "fn main(_: [+]) -> [+] { missing(); }";
/// assert!(run_program(source, &[]).is_err());
/// ```
pub fn run_program(source: &str, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut context = Context::new();
    context.run_source(source, args)
}
