use std::iter::Peekable;

use crate::{
    ast::{
        Body, Compare, CompareOp, Condition, ForLoop, IfChain, ReturnStatement, Statement,
        VarAssign, VarBinding, VarDecl, WhileLoop,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_descriptor},
            expression::{parse_expression, parse_function_call},
            utils::{
                current_line, expect_identifier, expect_keyword, expect_token, next_is,
                next_is_keyword,
            },
        },
    },
};

/// Parses a `{ ... }` body: statements until the closing brace.
pub fn parse_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Body>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect_token(tokens, "Body", &Token::LBrace, "'{'")?;

    let mut statements = Vec::new();
    while !next_is(tokens, &Token::RBrace) {
        if tokens.peek().is_none() {
            return Err(ParseError::UnexpectedEof { source:   "Body",
                                                   expected: "'}'".to_string(),
                                                   line:     0, });
        }
        statements.push(parse_statement(tokens)?);
    }

    expect_token(tokens, "Body", &Token::RBrace, "'}'")?;
    Ok(Body { statements })
}

/// Parses a single statement.
///
/// A statement is one of:
/// - an `if` / `else if` / `else` chain,
/// - a `for` loop,
/// - a `while` loop,
/// - a `return`,
/// - a function call or variable binding, terminated by `;`.
///
/// The leading identifier decides the production; keywords are matched by
/// lexeme.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let keyword = match tokens.peek() {
        Some((Token::Identifier(name), _)) => name.clone(),
        Some((token, line)) => {
            return Err(ParseError::UnexpectedToken { source:   "Statement",
                                                     token:    token.to_string(),
                                                     expected: "an identifier".to_string(),
                                                     line:     *line, });
        },
        None => {
            return Err(ParseError::UnexpectedEof { source:   "Statement",
                                                   expected: "a statement".to_string(),
                                                   line:     0, });
        },
    };

    match keyword.as_str() {
        "if" => Ok(Statement::If(parse_if(tokens)?)),
        "for" => Ok(Statement::For(parse_for(tokens)?)),
        "while" => Ok(Statement::While(parse_while(tokens)?)),
        "return" => Ok(Statement::Return(parse_return(tokens)?)),
        _ => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            let statement = if matches!(lookahead.peek(), Some((Token::LParen, _))) {
                Statement::Call(parse_function_call(tokens)?)
            } else {
                Statement::Binding(parse_binding(tokens)?)
            };
            expect_token(tokens, "Statement", &Token::Semicolon, "';'")?;
            Ok(statement)
        },
    }
}

/// Parses a variable binding: a `let` declaration or an assignment to an
/// existing name.
pub fn parse_binding<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<VarBinding>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if next_is_keyword(tokens, "let") {
        Ok(VarBinding::Declaration(parse_declaration(tokens)?))
    } else {
        let (name, line) = expect_identifier(tokens, "Variable Assignment")?;
        expect_token(tokens, "Variable Assignment", &Token::Equals, "'='")?;
        let value = parse_expression(tokens)?;
        Ok(VarBinding::Assignment(VarAssign { name, value, line }))
    }
}

/// Parses a `let` declaration: `let name: [descriptor] [= expression]`.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<VarDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect_keyword(tokens, "Variable Declaration", "let")?;
    let (name, _) = expect_identifier(tokens, "Variable Declaration")?;
    expect_token(tokens, "Variable Declaration", &Token::Colon, "':'")?;
    let descriptor = parse_descriptor(tokens)?;

    let value = if next_is(tokens, &Token::Equals) {
        tokens.next();
        Some(parse_expression(tokens)?)
    } else {
        None
    };

    Ok(VarDecl { name,
                 descriptor,
                 value,
                 line })
}

/// Parses an `if` chain with optional `else if` links and `else` body.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<IfChain>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect_keyword(tokens, "If", "if")?;
    let condition = parse_condition(tokens)?;
    let body = parse_body(tokens)?;

    let mut else_if = None;
    let mut else_body = None;

    if next_is_keyword(tokens, "else") {
        tokens.next();
        if next_is(tokens, &Token::LBrace) {
            else_body = Some(parse_body(tokens)?);
        } else if next_is_keyword(tokens, "if") {
            else_if = Some(Box::new(parse_if(tokens)?));
        } else {
            let token_line = current_line(tokens);
            let token = tokens.next()
                              .map_or_else(String::new, |(token, _)| token.to_string());
            return Err(ParseError::UnexpectedToken { source: "If",
                                                     token,
                                                     expected: "'if' or '{' after 'else'"
                                                               .to_string(),
                                                     line: token_line, });
        }
    }

    Ok(IfChain { condition,
                 body,
                 else_if,
                 else_body,
                 line })
}

/// Parses a `while` loop; the condition shape is shared with `if`.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<WhileLoop>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect_keyword(tokens, "While", "while")?;
    let condition = parse_condition(tokens)?;
    let body = parse_body(tokens)?;
    Ok(WhileLoop { condition,
                   body,
                   line })
}

/// Parses a `for` loop: `for element : iterable { ... }`.
pub fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ForLoop>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect_keyword(tokens, "For Loop", "for")?;
    let (element, _) = expect_identifier(tokens, "For Loop")?;
    expect_token(tokens, "For Loop", &Token::Colon, "':'")?;
    let iterable = parse_expression(tokens)?;
    let body = parse_body(tokens)?;
    Ok(ForLoop { element,
                 iterable,
                 body,
                 line })
}

/// Parses a `return` statement: `return expression;`.
pub fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ReturnStatement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect_keyword(tokens, "Return", "return")?;
    let value = parse_expression(tokens)?;
    expect_token(tokens, "Return", &Token::Semicolon, "';'")?;
    Ok(ReturnStatement { value, line })
}

/// Parses an `if`/`while` condition: an if-let style declaration when the
/// next token is `let`, otherwise a comparison between two expressions.
pub fn parse_condition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Condition>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if next_is_keyword(tokens, "let") {
        return Ok(Condition::Declaration(parse_declaration(tokens)?));
    }

    let left = parse_expression(tokens)?;
    let op = parse_compare_op(tokens)?;
    let right = parse_expression(tokens)?;
    Ok(Condition::Compare(Compare { op, left, right }))
}

/// Parses one of the six comparison operators from one or two symbol
/// tokens.
fn parse_compare_op<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<CompareOp>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (first, line) = match tokens.next() {
        Some((token, line)) => (token.clone(), *line),
        None => {
            return Err(ParseError::UnexpectedEof { source:   "If Comparison",
                                                   expected: "a comparison operator".to_string(),
                                                   line:     0, });
        },
    };

    let followed_by_equals = next_is(tokens, &Token::Equals);
    if followed_by_equals {
        tokens.next();
    }

    match (&first, followed_by_equals) {
        (Token::Less, true) => Ok(CompareOp::Le),
        (Token::Less, false) => Ok(CompareOp::Lt),
        (Token::Greater, true) => Ok(CompareOp::Ge),
        (Token::Greater, false) => Ok(CompareOp::Gt),
        (Token::Equals, true) => Ok(CompareOp::Eq),
        (Token::Bang, true) => Ok(CompareOp::Ne),
        _ => Err(ParseError::UnexpectedToken { source:   "If Comparison",
                                               token:    first.to_string(),
                                               expected: "a comparison operator".to_string(),
                                               line, }),
    }
}
