#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while parsing the token stream.
///
/// The parser aborts on the first error; there is no recovery.
pub enum ParseError {
    /// Found a token that does not fit the grammar production being parsed.
    UnexpectedToken {
        /// The grammar production being parsed (e.g. "Function Definition").
        source:   &'static str,
        /// The offending lexeme.
        token:    String,
        /// A description of what was expected instead.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The token stream ended inside a grammar production.
    UnexpectedEof {
        /// The grammar production being parsed.
        source:   &'static str,
        /// A description of what was expected next.
        expected: String,
        /// The last source line seen.
        line:     usize,
    },
    /// An arithmetic expression contained no operands.
    EmptyExpression {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An arithmetic expression had unbalanced parentheses.
    UnbalancedParentheses {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An arithmetic expression had operands left over after folding.
    InvalidExpression {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { source,
                                    token,
                                    expected,
                                    line, } => {
                write!(f,
                       "Unexpected token '{token}' in {source} on line {line}. Expected \
                        {expected}.")
            },
            Self::UnexpectedEof { source,
                                  expected,
                                  line, } => {
                write!(f,
                       "Unexpected end of file in {source} on line {line}. Expected {expected}.")
            },
            Self::EmptyExpression { line } => {
                write!(f, "Empty expression on line {line}.")
            },
            Self::UnbalancedParentheses { line } => {
                write!(f, "Unbalanced parentheses in expression on line {line}.")
            },
            Self::InvalidExpression { line } => {
                write!(f, "Malformed arithmetic expression on line {line}.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
