/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// manages the scope chain, dispatches builtins and methods, and drives
/// the module loader. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, and control flow.
/// - Reports runtime errors such as undefined names or length-contract
///   violations.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens,
/// each corresponding to a meaningful language element: integers,
/// identifiers, string literals, and single-character symbols. This is
/// the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with line numbers.
/// - Decodes string-literal escape sequences.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and
/// constructs an AST representing the syntactic structure of the program:
/// top-level items, statements, and expressions (including the
/// Shunting-Yard arithmetic sub-parser).
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates grammar and syntax, aborting on the first error.
/// - Desugars shorthand forms (string literals, single-index slices).
pub mod parser;
/// The value module defines the runtime data type for evaluation.
///
/// The only first-class datum is an array of 32-bit integers. This module
/// declares the [`value::Value`] type with its two storage disciplines
/// (fixed and growable), the minimum-length contract, elementwise
/// arithmetic, the all-pairs comparison family, and the canonical string
/// form.
pub mod value;
