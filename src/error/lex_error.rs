#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while tokenizing source text.
pub enum LexError {
    /// Found a character that cannot begin any token.
    UnexpectedCharacter {
        /// The character encountered.
        found: char,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A string literal was still open when the input ended.
    UnterminatedString {
        /// The source line where the string began.
        line: usize,
    },
    /// A string literal contained an unsupported escape sequence.
    InvalidEscape {
        /// The character following the backslash.
        escape: char,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// An integer literal was too large to be represented.
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { found, line } => {
                write!(f, "Unexpected character '{found}' on line {line}.")
            },
            Self::UnterminatedString { line } => {
                write!(f, "Unterminated string literal on line {line}.")
            },
            Self::InvalidEscape { escape, line } => {
                write!(f, "Unexpected character after '\\': '{escape}' on line {line}.")
            },
            Self::LiteralTooLarge { line } => {
                write!(f, "Integer literal on line {line} is too large.")
            },
        }
    }
}

impl std::error::Error for LexError {}
