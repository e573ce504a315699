/// Lexing errors.
///
/// Defines the errors that can occur while turning source text into tokens:
/// unexpected characters, unterminated strings, invalid escape sequences, and
/// integer literals that do not fit the value type.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the AST from the
/// token stream. Parse errors carry the grammar production being parsed, the
/// offending lexeme, and a description of what was expected.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: undefined
/// names, arity mismatches, length-contract violations, out-of-range slices,
/// and failures of the host-facing builtins.
pub mod runtime_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
