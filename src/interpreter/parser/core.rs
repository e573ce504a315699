use std::iter::Peekable;

use crate::{
    ast::{ArrayDescriptor, ArrayExpr, FunctionDef, Item, Param, Program, UseDirective, UseKind},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            expression::{parse_array_expr, parse_function_call},
            statement::{parse_binding, parse_body},
            utils::{
                expect_identifier, expect_keyword, expect_token, next_is, string_to_ints,
            },
        },
    },
    util::num::int_to_size,
};

/// Result type used by the parser.
///
/// All parsing functions return either a node of type `T` or a
/// [`ParseError`] describing the first failure; there is no recovery.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole token stream into a [`Program`].
///
/// Top-level items are function definitions, `use` directives, and
/// (tolerated, but never evaluated) variable bindings and function calls
/// terminated by `;`.
///
/// # Parameters
/// - `tokens`: The `(Token, line)` stream produced by the lexer.
///
/// # Errors
/// Returns the first [`ParseError`] encountered.
///
/// # Example
/// ```
/// use arrai::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("fn main(_: [+]) -> [+] { print(\"Hi\"); }").unwrap();
/// let program = parse_program(&tokens).unwrap();
///
/// assert_eq!(program.items.len(), 1);
/// ```
pub fn parse_program(tokens: &[(Token, usize)]) -> ParseResult<Program> {
    let mut iter = tokens.iter().peekable();
    let mut items = Vec::new();

    while iter.peek().is_some() {
        items.push(parse_item(&mut iter)?);
    }

    Ok(Program { items })
}

/// Parses one top-level item.
fn parse_item<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Item>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let keyword = match tokens.peek() {
        Some((Token::Identifier(name), _)) => name.clone(),
        Some((token, line)) => {
            return Err(ParseError::UnexpectedToken { source: "Program",
                                                     token: token.to_string(),
                                                     expected:
                                                         "'fn', 'use', 'let', or an identifier"
                                                             .to_string(),
                                                     line: *line, });
        },
        None => {
            return Err(ParseError::UnexpectedEof { source:   "Program",
                                                   expected: "a top-level item".to_string(),
                                                   line:     0, });
        },
    };

    match keyword.as_str() {
        "fn" => Ok(Item::Function(parse_function_definition(tokens)?)),
        "use" => Ok(Item::Use(parse_use(tokens)?)),
        _ => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            let item = if matches!(lookahead.peek(), Some((Token::LParen, _))) {
                Item::Call(parse_function_call(tokens)?)
            } else {
                Item::Binding(parse_binding(tokens)?)
            };
            expect_token(tokens, "Program", &Token::Semicolon, "';'")?;
            Ok(item)
        },
    }
}

/// Parses a function definition:
///
/// ```text
///     fn name(param: [..], ...) -> [..] { ... }
/// ```
///
/// # Errors
/// - `UnexpectedToken` when any keyword or symbol of the production is
///   missing.
/// - Propagates errors from descriptor and body parsing.
pub fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<FunctionDef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect_keyword(tokens, "Function Definition", "fn")?;
    let (name, _) = expect_identifier(tokens, "Function Definition")?;
    expect_token(tokens, "Function Definition", &Token::LParen, "'('")?;

    let mut params = Vec::new();
    if !next_is(tokens, &Token::RParen) {
        loop {
            params.push(parse_param(tokens)?);
            if next_is(tokens, &Token::Comma) {
                tokens.next();
            } else {
                break;
            }
        }
    }

    expect_token(tokens, "Function Definition", &Token::RParen, "')'")?;
    expect_token(tokens, "Function Definition", &Token::Minus, "'->'")?;
    expect_token(tokens, "Function Definition", &Token::Greater, "'->'")?;

    let output = parse_descriptor(tokens)?;
    let body = parse_body(tokens)?;

    Ok(FunctionDef { name,
                     params,
                     output,
                     body,
                     line })
}

/// Parses one function parameter: `name: [descriptor]`.
fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Param>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (name, _) = expect_identifier(tokens, "Function Parameter")?;
    expect_token(tokens, "Function Parameter", &Token::Colon, "':'")?;
    Ok(Param { name,
               descriptor: parse_descriptor(tokens)? })
}

/// Parses an array descriptor: `[`, an optional size, an optional `+`,
/// then `]`.
pub fn parse_descriptor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ArrayDescriptor>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect_token(tokens, "Array Descriptor", &Token::LBracket, "'['")?;

    let size = match tokens.peek() {
        Some((Token::Integer(value), line)) => {
            let (value, line) = (*value, *line);
            tokens.next();
            Some(int_to_size(value,
                             ParseError::UnexpectedToken { source:   "Array Descriptor",
                                                           token:    value.to_string(),
                                                           expected: "a non-negative size"
                                                                     .to_string(),
                                                           line, })?)
        },
        _ => None,
    };

    let can_grow = next_is(tokens, &Token::Plus);
    if can_grow {
        tokens.next();
    }

    expect_token(tokens, "Array Descriptor", &Token::RBracket, "']'")?;
    Ok(ArrayDescriptor { size, can_grow })
}

/// Parses a `use` directive: `use "path"` (any array expression is
/// accepted) or `use <header>`.
pub fn parse_use<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<UseDirective>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect_keyword(tokens, "Use", "use")?;

    if next_is(tokens, &Token::Less) {
        tokens.next();
        let (name, _) = expect_identifier(tokens, "Use")?;
        expect_token(tokens, "Use", &Token::Greater, "'>'")?;
        return Ok(UseDirective { target: ArrayExpr::Literal(string_to_ints(&name)),
                                 kind: UseKind::StandardHeader,
                                 line });
    }

    Ok(UseDirective { target: parse_array_expr(tokens)?,
                      kind: UseKind::Path,
                      line })
}
