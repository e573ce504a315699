use logos::{Lexer, Logos, Skip};

use crate::error::LexError;

/// Represents a lexical token in the source input.
///
/// Keywords (`fn`, `use`, `let`, `if`, `else`, `for`, `while`, `return`) are
/// not distinguished here; they are ordinary [`Token::Identifier`]s whose
/// lexemes the parser matches.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Integer literal tokens, such as `42`. The sign is not part of the
    /// token; the parser folds a preceding `-` where a negative element is
    /// legal.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i32),
    /// Identifier tokens; names such as `x`, `main` or keywords.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// String literal tokens with their escape sequences already decoded.
    /// Strings may span multiple lines.
    #[regex(r#""([^"\\]|\\.)*""#, decode_string)]
    Text(String),
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `-`
    #[token("-")]
    Minus,
    /// `>`
    #[token(">")]
    Greater,
    /// `<`
    #[token("<")]
    Less,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `:`
    #[token(":")]
    Colon,
    /// `+`
    #[token("+")]
    Plus,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equals,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `.`
    #[token(".")]
    Dot,
    /// `,`
    #[token(",")]
    Comma,

    /// Newlines advance the line counter and are discarded.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Parses an integer literal from the current token slice.
///
/// Returns `None` (a lexing failure) when the literal does not fit `i32`.
fn parse_integer(lex: &Lexer<Token>) -> Option<i32> {
    lex.slice().parse().ok()
}

/// Decodes a string literal, resolving escape sequences.
///
/// The supported escapes are `\n \t \r \\ \" \' \0`; any other escape makes
/// the literal a lexing failure. Literal newlines are kept and counted
/// toward the line counter.
fn decode_string(lex: &mut Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    lex.extras.line += slice.chars().filter(|&c| c == '\n').count();

    let raw = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => result.push('\n'),
                't' => result.push('\t'),
                'r' => result.push('\r'),
                '\\' => result.push('\\'),
                '"' => result.push('"'),
                '\'' => result.push('\''),
                '0' => result.push('\0'),
                _ => return None,
            }
        } else {
            result.push(c);
        }
    }

    Some(result)
}

/// Turns source text into a stream of `(Token, line)` pairs.
///
/// # Parameters
/// - `source`: The raw source text.
///
/// # Errors
/// Returns a [`LexError`] for the first unexpected character, unterminated
/// string, invalid escape sequence, or oversized integer literal.
///
/// # Example
/// ```
/// use arrai::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("let x: [+]").unwrap();
///
/// assert_eq!(tokens[0].0, Token::Identifier("let".to_string()));
/// assert_eq!(tokens[2].0, Token::Colon);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push((tok, lexer.extras.line)),
            Err(()) => return Err(classify_failure(lexer.slice(), lexer.extras.line)),
        }
    }

    Ok(tokens)
}

/// Maps a failed lexer span to a specific [`LexError`].
///
/// A span beginning with `"` is a string failure: a full match rejected by
/// the escape decoder, or an unterminated literal. A span beginning with a
/// digit is an oversized integer. Anything else is a stray character.
fn classify_failure(slice: &str, line: usize) -> LexError {
    if let Some(rest) = slice.strip_prefix('"') {
        if rest.ends_with('"') && !rest.is_empty() {
            LexError::InvalidEscape { escape: find_invalid_escape(rest),
                                      line }
        } else {
            LexError::UnterminatedString { line }
        }
    } else if slice.starts_with(|c: char| c.is_ascii_digit()) {
        LexError::LiteralTooLarge { line }
    } else {
        LexError::UnexpectedCharacter { found: slice.chars().next().unwrap_or(' '),
                                        line }
    }
}

fn find_invalid_escape(raw: &str) -> char {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 't' | 'r' | '\\' | '"' | '\'' | '0') => {},
                Some(other) => return other,
                None => break,
            }
        }
    }
    '\\'
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Minus => write!(f, "-"),
            Self::Greater => write!(f, ">"),
            Self::Less => write!(f, "<"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::Colon => write!(f, ":"),
            Self::Plus => write!(f, "+"),
            Self::Bang => write!(f, "!"),
            Self::Equals => write!(f, "="),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Semicolon => write!(f, ";"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Dot => write!(f, "."),
            Self::Comma => write!(f, ","),
            Self::NewLine | Self::Ignored => Ok(()),
        }
    }
}
