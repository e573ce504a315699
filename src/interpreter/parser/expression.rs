use std::iter::Peekable;

use crate::{
    ast::{
        Arithmetic, ArithmeticOp, ArrayExpr, Bound, Expression, FunctionCall, Method, Postfix,
        Primary, Range,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            utils::{
                current_line, expect_identifier, expect_integer, expect_token, next_is,
                string_to_ints,
            },
        },
    },
};

/// One element of the Shunting-Yard output queue.
enum RpnItem {
    Operand(Expression),
    Operator(ArithmeticOp),
}

/// One element of the Shunting-Yard operator stack.
enum OpEntry {
    Operator(ArithmeticOp),
    Parenthesis,
}

/// What the scanner decided to do with the next token.
enum Step {
    Operand,
    Operator(ArithmeticOp),
    Open,
    Close,
    Halt,
}

const fn precedence(op: ArithmeticOp) -> u8 {
    match op {
        ArithmeticOp::Add | ArithmeticOp::Sub => 1,
        ArithmeticOp::Mul | ArithmeticOp::Div => 2,
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. A left-to-right
/// Shunting-Yard walk collects operands (array expressions with their
/// postfix chains) and the four arithmetic operators into an RPN queue,
/// which is then folded into a left-associative binary tree.
///
/// The scan halts, without consuming, at the first token that is neither an
/// operand, an operator, nor a parenthesis belonging to the expression;
/// control returns to the enclosing parser.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node.
///
/// # Errors
/// - `EmptyExpression` when no operand is found.
/// - `UnbalancedParentheses` when a `(` is never closed.
/// - `InvalidExpression` when operands are left over after folding.
/// - Propagates any errors from operand parsing.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expression>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = current_line(tokens);
    let mut output: Vec<RpnItem> = Vec::new();
    let mut operators: Vec<OpEntry> = Vec::new();

    loop {
        let step = match tokens.peek() {
            Some((Token::Identifier(_) | Token::Text(_) | Token::LBracket | Token::Integer(_),
                  _)) => Step::Operand,
            Some((Token::Plus, _)) => Step::Operator(ArithmeticOp::Add),
            Some((Token::Minus, _)) => Step::Operator(ArithmeticOp::Sub),
            Some((Token::Star, _)) => Step::Operator(ArithmeticOp::Mul),
            Some((Token::Slash, _)) => Step::Operator(ArithmeticOp::Div),
            Some((Token::LParen, _)) => Step::Open,
            Some((Token::RParen, _)) => Step::Close,
            _ => Step::Halt,
        };

        match step {
            Step::Operand => output.push(RpnItem::Operand(parse_operand(tokens)?)),
            Step::Operator(op) => {
                tokens.next();
                while let Some(OpEntry::Operator(top)) = operators.last() {
                    if precedence(*top) >= precedence(op) {
                        output.push(RpnItem::Operator(*top));
                        operators.pop();
                    } else {
                        break;
                    }
                }
                operators.push(OpEntry::Operator(op));
            },
            Step::Open => {
                tokens.next();
                operators.push(OpEntry::Parenthesis);
            },
            Step::Close => {
                // A `)` with no open `(` of our own closes an enclosing
                // construct; hand it back unconsumed.
                if !operators.iter().any(|entry| matches!(entry, OpEntry::Parenthesis)) {
                    break;
                }
                tokens.next();
                while let Some(entry) = operators.pop() {
                    match entry {
                        OpEntry::Operator(op) => output.push(RpnItem::Operator(op)),
                        OpEntry::Parenthesis => break,
                    }
                }
            },
            Step::Halt => break,
        }
    }

    while let Some(entry) = operators.pop() {
        match entry {
            OpEntry::Operator(op) => output.push(RpnItem::Operator(op)),
            OpEntry::Parenthesis => return Err(ParseError::UnbalancedParentheses { line }),
        }
    }

    fold_rpn(output, line)
}

/// Folds the RPN queue into an expression tree.
fn fold_rpn(items: Vec<RpnItem>, line: usize) -> ParseResult<Expression> {
    let mut stack: Vec<Expression> = Vec::new();

    for item in items {
        match item {
            RpnItem::Operand(expression) => stack.push(expression),
            RpnItem::Operator(op) => {
                let right = stack.pop().ok_or(ParseError::EmptyExpression { line })?;
                let left = stack.pop().ok_or(ParseError::EmptyExpression { line })?;
                stack.push(Expression { primary: Primary::Arithmetic(Box::new(Arithmetic { left,
                                                                                           op,
                                                                                           right })),
                                        postfix: Vec::new(),
                                        line });
            },
        }
    }

    let result = stack.pop().ok_or(ParseError::EmptyExpression { line })?;
    if stack.is_empty() {
        Ok(result)
    } else {
        Err(ParseError::InvalidExpression { line })
    }
}

/// Parses a single operand: an array expression with its postfix chain.
fn parse_operand<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expression>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = current_line(tokens);
    let array = parse_array_expr(tokens)?;
    let postfix = parse_postfix(tokens)?;
    Ok(Expression { primary: Primary::Array(array),
                    postfix,
                    line })
}

/// Parses an array expression: a string literal, a bracketed integer list,
/// a bare integer (sugar for a one-element array), a function call, or an
/// identifier reference.
///
/// # Errors
/// `UnexpectedToken` when the next token cannot begin an array expression.
pub fn parse_array_expr<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ArrayExpr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::Integer(value), _)) => {
            let value = *value;
            tokens.next();
            Ok(ArrayExpr::Literal(vec![value]))
        },
        Some((Token::Identifier(_), _)) => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some((Token::LParen, _))) {
                Ok(ArrayExpr::Call(parse_function_call(tokens)?))
            } else {
                let (name, _) = expect_identifier(tokens, "Array")?;
                Ok(ArrayExpr::Variable(name))
            }
        },
        Some((Token::Text(text), _)) => {
            let values = string_to_ints(text);
            tokens.next();
            Ok(ArrayExpr::Literal(values))
        },
        Some((Token::LBracket, _)) => parse_int_list(tokens),
        Some((token, token_line)) => {
            Err(ParseError::UnexpectedToken { source: "Array",
                                              token: token.to_string(),
                                              expected: "an identifier, a string, or '['"
                                                        .to_string(),
                                              line: *token_line, })
        },
        None => Err(ParseError::UnexpectedEof { source:   "Array",
                                                expected: "an array expression".to_string(),
                                                line:     0, }),
    }
}

/// Parses a bracketed list of (possibly negated) integer literals.
fn parse_int_list<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ArrayExpr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect_token(tokens, "Array", &Token::LBracket, "'['")?;
    let mut values = Vec::new();

    while !next_is(tokens, &Token::RBracket) {
        let negated = next_is(tokens, &Token::Minus);
        if negated {
            tokens.next();
        }
        let (value, _) = expect_integer(tokens, "Array")?;
        values.push(if negated { -value } else { value });

        if next_is(tokens, &Token::Comma) {
            tokens.next();
        } else if !next_is(tokens, &Token::RBracket) {
            let token_line = current_line(tokens);
            let token = tokens.next()
                              .map_or_else(String::new, |(token, _)| token.to_string());
            return Err(ParseError::UnexpectedToken { source: "Array",
                                                     token,
                                                     expected: "',' or ']'".to_string(),
                                                     line: token_line, });
        }
    }

    expect_token(tokens, "Array", &Token::RBracket, "']'")?;
    Ok(ArrayExpr::Literal(values))
}

/// Parses a function call: `name(expr, expr, ...)`.
pub fn parse_function_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<FunctionCall>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (name, line) = expect_identifier(tokens, "Function Call")?;
    expect_token(tokens, "Function Call", &Token::LParen, "'('")?;
    let arguments = parse_expressions(tokens, "Function Call")?;
    expect_token(tokens, "Function Call", &Token::RParen, "')'")?;
    Ok(FunctionCall { name,
                      arguments,
                      line })
}

/// Parses a comma-separated expression list, stopping before `)`.
///
/// The closing parenthesis is left for the caller to consume.
pub fn parse_expressions<'a, I>(tokens: &mut Peekable<I>,
                                source: &'static str)
                                -> ParseResult<Vec<Expression>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut expressions = Vec::new();

    while !next_is(tokens, &Token::RParen) {
        if tokens.peek().is_none() {
            return Err(ParseError::UnexpectedEof { source,
                                                   expected: "an expression or ')'".to_string(),
                                                   line: 0, });
        }
        expressions.push(parse_expression(tokens)?);
        if next_is(tokens, &Token::Comma) {
            tokens.next();
        }
    }

    Ok(expressions)
}

/// Parses the postfix chain following a primary: any number of ranges and
/// method calls, applied left to right.
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Postfix>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut result = Vec::new();

    loop {
        match tokens.peek() {
            Some((Token::LBracket, _)) => result.push(Postfix::Range(parse_range(tokens)?)),
            Some((Token::Dot, _)) => result.push(Postfix::Method(parse_method(tokens)?)),
            _ => break,
        }
    }

    Ok(result)
}

/// Parses a slice: `[lo:hi]` with optional bounds, or the single-index
/// shorthand `[n]`, which desugars to `[n:n+1]`.
fn parse_range<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Range>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect_token(tokens, "Array Range", &Token::LBracket, "'['")?;

    // Single-index shorthand: an integer immediately closed by ']'.
    if let Some((Token::Integer(_), _)) = tokens.peek() {
        let mut lookahead = tokens.clone();
        lookahead.next();
        if matches!(lookahead.peek(), Some((Token::RBracket, _))) {
            let (index, line) = expect_integer(tokens, "Array Range")?;
            expect_token(tokens, "Array Range", &Token::RBracket, "']'")?;
            let index = crate::util::num::int_to_size(index,
                                                      ParseError::UnexpectedToken {
                source: "Array Range",
                token: index.to_string(),
                expected: "a non-negative index".to_string(),
                line,
            })?;
            return Ok(Range { start: Some(Bound::Literal(index)),
                              end:   Some(Bound::Literal(index + 1)), });
        }
    }

    let start = parse_bound(tokens, &Token::Colon)?;
    expect_token(tokens, "Array Range", &Token::Colon, "':'")?;
    let end = parse_bound(tokens, &Token::RBracket)?;
    expect_token(tokens, "Array Range", &Token::RBracket, "']'")?;

    Ok(Range { start, end })
}

/// Parses one optional range bound, stopping before `terminator`.
fn parse_bound<'a, I>(tokens: &mut Peekable<I>,
                      terminator: &Token)
                      -> ParseResult<Option<Bound>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if next_is(tokens, terminator) {
        return Ok(None);
    }
    if let Some((Token::Integer(_), _)) = tokens.peek() {
        let (value, line) = expect_integer(tokens, "Array Range")?;
        let index = crate::util::num::int_to_size(value,
                                                  ParseError::UnexpectedToken {
            source: "Array Range",
            token: value.to_string(),
            expected: "a non-negative bound".to_string(),
            line,
        })?;
        return Ok(Some(Bound::Literal(index)));
    }
    Ok(Some(Bound::Expression(Box::new(parse_expression(tokens)?))))
}

/// Parses a postfix method call: `.name(expr, ...)`.
fn parse_method<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Method>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect_token(tokens, "Method", &Token::Dot, "'.'")?;
    let (name, line) = expect_identifier(tokens, "Method")?;
    expect_token(tokens, "Method", &Token::LParen, "'('")?;
    let arguments = parse_expressions(tokens, "Method")?;
    expect_token(tokens, "Method", &Token::RParen, "')'")?;
    Ok(Method { name,
                arguments,
                line })
}
