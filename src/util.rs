/// Numeric conversion helpers.
///
/// Safe conversions between the language's `i32` elements and host
/// `usize` indices, parameterized by the error to raise on failure so
/// both the parser and the evaluator can use them.
pub mod num;
/// Terminal access for the host-facing builtins.
///
/// Raw-mode single-key input with guaranteed attribute restoration, and
/// the terminal-clear invocation.
pub mod term;
