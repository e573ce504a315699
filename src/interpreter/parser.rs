/// Top-level grammar: programs, items, function definitions, descriptors
/// and `use` directives.
pub mod core;
/// Expression grammar: the Shunting-Yard arithmetic sub-parser, array
/// primaries, and postfix ranges and methods.
pub mod expression;
/// Statement grammar: bodies, bindings, loops, `if` chains, conditions
/// and `return`.
pub mod statement;
/// Expect/lookahead helpers shared across the parser.
pub mod utils;
