use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Returns the line number of the next token, or 0 at the end of input.
pub fn current_line<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.peek().map_or(0, |(_, line)| *line)
}

/// Tests whether the next token equals `token` without consuming it.
pub fn next_is<'a, I>(tokens: &mut Peekable<I>, token: &Token) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.peek().is_some_and(|(next, _)| next == token)
}

/// Tests whether the next token is the identifier `keyword` without
/// consuming it.
pub fn next_is_keyword<'a, I>(tokens: &mut Peekable<I>, keyword: &str) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    matches!(tokens.peek(), Some((Token::Identifier(name), _)) if name == keyword)
}

/// Consumes the next token, requiring it to be an identifier.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
/// - `source`: The grammar production used in error messages.
///
/// # Returns
/// The identifier text and its line number.
pub fn expect_identifier<'a, I>(tokens: &mut Peekable<I>,
                                source: &'static str)
                                -> ParseResult<(String, usize)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Identifier(name), line)) => Ok((name.clone(), *line)),
        Some((token, line)) => Err(ParseError::UnexpectedToken { source,
                                                                 token: token.to_string(),
                                                                 expected:
                                                                     "an identifier".to_string(),
                                                                 line: *line, }),
        None => Err(ParseError::UnexpectedEof { source,
                                                expected: "an identifier".to_string(),
                                                line: 0, }),
    }
}

/// Consumes the next token, requiring it to be the identifier `keyword`.
///
/// # Returns
/// The keyword's line number.
pub fn expect_keyword<'a, I>(tokens: &mut Peekable<I>,
                             source: &'static str,
                             keyword: &str)
                             -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Identifier(name), line)) if name == keyword => Ok(*line),
        Some((token, line)) => Err(ParseError::UnexpectedToken { source,
                                                                 token: token.to_string(),
                                                                 expected: format!("'{keyword}'"),
                                                                 line: *line, }),
        None => Err(ParseError::UnexpectedEof { source,
                                                expected: format!("'{keyword}'"),
                                                line: 0, }),
    }
}

/// Consumes the next token, requiring it to equal `expected_token`.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
/// - `source`: The grammar production used in error messages.
/// - `expected_token`: The token that must come next.
/// - `expected`: Human-readable rendering for error messages.
///
/// # Returns
/// The token's line number.
pub fn expect_token<'a, I>(tokens: &mut Peekable<I>,
                           source: &'static str,
                           expected_token: &Token,
                           expected: &str)
                           -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((token, line)) if token == expected_token => Ok(*line),
        Some((token, line)) => Err(ParseError::UnexpectedToken { source,
                                                                 token: token.to_string(),
                                                                 expected: expected.to_string(),
                                                                 line: *line, }),
        None => Err(ParseError::UnexpectedEof { source,
                                                expected: expected.to_string(),
                                                line: 0, }),
    }
}

/// Consumes the next token, requiring it to be an integer literal.
///
/// # Returns
/// The integer value and its line number.
pub fn expect_integer<'a, I>(tokens: &mut Peekable<I>,
                             source: &'static str)
                             -> ParseResult<(i32, usize)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Integer(value), line)) => Ok((*value, *line)),
        Some((token, line)) => Err(ParseError::UnexpectedToken { source,
                                                                 token: token.to_string(),
                                                                 expected: "an integer literal"
                                                                           .to_string(),
                                                                 line: *line, }),
        None => Err(ParseError::UnexpectedEof { source,
                                                expected: "an integer literal".to_string(),
                                                line: 0, }),
    }
}

/// Converts a decoded string literal into its byte values.
///
/// Strings are sugar for integer arrays: each byte of the text becomes one
/// element.
#[must_use]
pub fn string_to_ints(text: &str) -> Vec<i32> {
    text.bytes().map(i32::from).collect()
}
