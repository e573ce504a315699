use std::fmt::{self, Write as _};

use crate::interpreter::value::is_displayable;

/// An abstract syntax tree (AST) node representing a whole source file.
///
/// A program is an ordered sequence of top-level items. Only function
/// definitions and `use` directives are acted upon by the evaluator; bindings
/// and calls are accepted by the grammar and then ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The top-level items in source order.
    pub items: Vec<Item>,
}

/// A single top-level item.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A function definition (`fn name(...) -> [...] { ... }`).
    Function(FunctionDef),
    /// A module-inclusion directive (`use "file"` or `use <header>`).
    Use(UseDirective),
    /// A variable binding terminated by `;`. Parsed, never evaluated.
    Binding(VarBinding),
    /// A function call terminated by `;`. Parsed, never evaluated.
    Call(FunctionCall),
}

/// A user-defined function.
///
/// Parameters and the output carry array descriptors; argument values are
/// coerced through the parameter descriptors on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:   String,
    /// The declared parameters, in order.
    pub params: Vec<Param>,
    /// The descriptor of the returned array.
    pub output: ArrayDescriptor,
    /// The statements executed on a call.
    pub body:   Body,
    /// Line number in the source code.
    pub line:   usize,
}

/// A single function parameter: a name and its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name.
    pub name:       String,
    /// The shape constraint for the bound argument.
    pub descriptor: ArrayDescriptor,
}

/// A compile-time shape constraint on an array.
///
/// The four meaningful forms are `[n]` (fixed size), `[n+]` (growable with
/// minimum `n`), `[+]` (freely growable) and `[]` (size deferred to an
/// initializer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayDescriptor {
    /// The declared size, when one is given.
    pub size:     Option<usize>,
    /// Whether the array may grow past the declared size.
    pub can_grow: bool,
}

/// An ordered list of statements between `{` and `}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// The statements, in source order.
    pub statements: Vec<Statement>,
}

/// A single statement inside a body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A declaration or assignment, terminated by `;`.
    Binding(VarBinding),
    /// A `for` loop over the elements of an array.
    For(ForLoop),
    /// A `while` loop.
    While(WhileLoop),
    /// An `if` / `else if` / `else` chain.
    If(IfChain),
    /// A function call evaluated for its effects, terminated by `;`.
    Call(FunctionCall),
    /// An early return from the enclosing function.
    Return(ReturnStatement),
}

/// `return <expression>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// The returned expression.
    pub value: Expression,
    /// Line number in the source code.
    pub line:  usize,
}

/// Either a declaration (`let x: [..] = ..`) or an assignment (`x = ..`).
#[derive(Debug, Clone, PartialEq)]
pub enum VarBinding {
    /// A `let` declaration.
    Declaration(VarDecl),
    /// An assignment to an existing binding.
    Assignment(VarAssign),
}

/// A `let` declaration with a descriptor and an optional initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// The declared name.
    pub name:       String,
    /// The declared shape.
    pub descriptor: ArrayDescriptor,
    /// The initializer, when present.
    pub value:      Option<Expression>,
    /// Line number in the source code.
    pub line:       usize,
}

/// An assignment of an expression to an already-declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct VarAssign {
    /// The assigned name.
    pub name:  String,
    /// The right-hand side.
    pub value: Expression,
    /// Line number in the source code.
    pub line:  usize,
}

/// The condition of an `if` or `while`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A comparison between two expressions.
    Compare(Compare),
    /// An if-let style declaration: the branch is taken when the
    /// initializer's length satisfies the descriptor.
    Declaration(VarDecl),
}

/// A comparison between two array expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    /// The comparison operator.
    pub op:    CompareOp,
    /// Left operand.
    pub left:  Expression,
    /// Right operand.
    pub right: Expression,
}

/// The six comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// An `if` chain with an optional `else if` continuation and `else` body.
#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    /// The branch condition.
    pub condition: Condition,
    /// Statements executed when the condition holds.
    pub body:      Body,
    /// The next `else if` link, if any.
    pub else_if:   Option<Box<IfChain>>,
    /// The final `else` body, if any.
    pub else_body: Option<Body>,
    /// Line number in the source code.
    pub line:      usize,
}

/// A `while` loop; the condition has the same shape as an `if` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    /// The loop condition, re-evaluated before each iteration.
    pub condition: Condition,
    /// The loop body.
    pub body:      Body,
    /// Line number in the source code.
    pub line:      usize,
}

/// A `for` loop binding each element of an iterable in turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// The name bound to the current element (as a one-element array).
    pub element:  String,
    /// The iterated expression, evaluated once.
    pub iterable: Expression,
    /// The loop body.
    pub body:     Body,
    /// Line number in the source code.
    pub line:     usize,
}

/// A call to a user-defined or builtin function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The callee name.
    pub name:      String,
    /// The argument expressions.
    pub arguments: Vec<Expression>,
    /// Line number in the source code.
    pub line:      usize,
}

/// A `use` directive naming another source file to load.
#[derive(Debug, Clone, PartialEq)]
pub struct UseDirective {
    /// The target, evaluated to a filename at load time.
    pub target: ArrayExpr,
    /// Whether the target was written as a path or a standard header.
    pub kind:   UseKind,
    /// Line number in the source code.
    pub line:   usize,
}

/// The two spellings of a `use` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseKind {
    /// `use "some/file.ints"`
    Path,
    /// `use <header>`
    StandardHeader,
}

/// A full expression: a primary followed by postfix operations applied
/// left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// The primary value.
    pub primary: Primary,
    /// Ranges and method calls suffixing the primary.
    pub postfix: Vec<Postfix>,
    /// Line number in the source code.
    pub line:    usize,
}

/// The primary of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// A binary arithmetic tree.
    Arithmetic(Box<Arithmetic>),
    /// A plain array expression.
    Array(ArrayExpr),
}

/// One arithmetic operation over two sub-expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Arithmetic {
    /// Left operand.
    pub left:  Expression,
    /// The operator.
    pub op:    ArithmeticOp,
    /// Right operand.
    pub right: Expression,
}

/// The four elementwise arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
}

/// The atoms an expression can start from.
///
/// String literals are sugar for integer vectors and are already decoded to
/// `Literal` by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayExpr {
    /// A literal vector of integers.
    Literal(Vec<i32>),
    /// A reference to a bound name.
    Variable(String),
    /// A function call producing an array.
    Call(FunctionCall),
}

/// A single postfix operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Postfix {
    /// A slice (`[lo:hi]`, or the `[n]` shorthand for `[n:n+1]`).
    Range(Range),
    /// A method call (`.append(..)`, `.sqrt()`, `.size()`).
    Method(Method),
}

/// A slice with optional bounds. A missing start means 0; a missing end
/// means the current length.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    /// The inclusive lower bound.
    pub start: Option<Bound>,
    /// The exclusive upper bound.
    pub end:   Option<Bound>,
}

/// A slice bound: a literal index or an expression evaluating to a
/// one-element array.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// A literal index.
    Literal(usize),
    /// An expression resolved at evaluation time.
    Expression(Box<Expression>),
}

/// A postfix method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// The method name.
    pub name:      String,
    /// The argument expressions.
    pub arguments: Vec<Expression>,
    /// Line number in the source code.
    pub line:      usize,
}

impl Expression {
    /// Wraps a vector of integers as a bare literal expression.
    ///
    /// Used by the interpreter when it synthesizes arguments (for example
    /// the argv arrays passed to `main`).
    ///
    /// ## Example
    /// ```
    /// use arrai::ast::Expression;
    ///
    /// let expr = Expression::from_ints(vec![1, 2, 3], 1);
    /// assert_eq!(expr.to_string(), "[1, 2, 3]");
    /// ```
    #[must_use]
    pub const fn from_ints(values: Vec<i32>, line: usize) -> Self {
        Self { primary: Primary::Array(ArrayExpr::Literal(values)),
               postfix: Vec::new(),
               line }
    }
}

const TAB: &str = "    ";

fn tabs(n: usize) -> String {
    TAB.repeat(n)
}

fn write_arguments(f: &mut fmt::Formatter<'_>, arguments: &[Expression]) -> fmt::Result {
    for (index, argument) in arguments.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{argument}")?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                Item::Function(def) => {
                    def.fmt_indented(f, 0)?;
                    writeln!(f)?;
                },
                Item::Use(directive) => writeln!(f, "{directive}")?,
                Item::Binding(binding) => writeln!(f, "{binding};")?,
                Item::Call(call) => writeln!(f, "{call};")?,
            }
        }
        Ok(())
    }
}

impl FunctionDef {
    /// Renders the definition at the given indentation depth.
    pub fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{}fn {}(", tabs(indent), self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") -> {} ", self.output)?;
        self.body.fmt_indented(f, indent)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.descriptor)
    }
}

impl fmt::Display for ArrayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if let Some(size) = self.size {
            write!(f, "{size}")?;
        }
        if self.can_grow {
            write!(f, "+")?;
        }
        write!(f, "]")
    }
}

impl Body {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(f, "{{")?;
        for statement in &self.statements {
            statement.fmt_indented(f, indent + 1)?;
            writeln!(f)?;
        }
        write!(f, "{}}}", tabs(indent))
    }
}

impl Statement {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{}", tabs(indent))?;
        match self {
            Self::Binding(binding) => write!(f, "{binding};"),
            Self::For(for_loop) => for_loop.fmt_indented(f, indent),
            Self::While(while_loop) => while_loop.fmt_indented(f, indent),
            Self::If(if_chain) => if_chain.fmt_indented(f, indent),
            Self::Call(call) => write!(f, "{call};"),
            Self::Return(ret) => write!(f, "return {};", ret.value),
        }
    }
}

impl fmt::Display for VarBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declaration(decl) => write!(f, "{decl}"),
            Self::Assignment(assign) => write!(f, "{} = {}", assign.name, assign.value),
        }
    }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "let {}: {}", self.name, self.descriptor)?;
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}

impl IfChain {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "if {} ", self.condition)?;
        self.body.fmt_indented(f, indent)?;
        if let Some(else_if) = &self.else_if {
            write!(f, " else ")?;
            else_if.fmt_indented(f, indent)?;
        }
        if let Some(else_body) = &self.else_body {
            write!(f, " else ")?;
            else_body.fmt_indented(f, indent)?;
        }
        Ok(())
    }
}

impl WhileLoop {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "while {} ", self.condition)?;
        self.body.fmt_indented(f, indent)
    }
}

impl ForLoop {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "for {} : {} ", self.element, self.iterable)?;
        self.body.fmt_indented(f, indent)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare(compare) => {
                write!(f, "{} {} {}", compare.left, compare.op, compare.right)
            },
            Self::Declaration(decl) => write!(f, "{decl}"),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.primary {
            Primary::Arithmetic(arithmetic) => write!(f, "{arithmetic}")?,
            Primary::Array(array) => write!(f, "{array}")?,
        }
        for postfix in &self.postfix {
            write!(f, "{postfix}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Arithmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for ArrayExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            },
            Self::Variable(name) => write!(f, "{name}"),
            Self::Call(call) => write!(f, "{call}"),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_arguments(f, &self.arguments)?;
        write!(f, ")")
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => write!(f, "{range}"),
            Self::Method(method) => write!(f, "{method}"),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if let Some(start) = &self.start {
            write!(f, "{start}")?;
        }
        write!(f, ":")?;
        if let Some(end) = &self.end {
            write!(f, "{end}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(index) => write!(f, "{index}"),
            Self::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}(", self.name)?;
        write_arguments(f, &self.arguments)?;
        write!(f, ")")
    }
}

impl fmt::Display for UseDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.target) {
            (UseKind::StandardHeader, ArrayExpr::Literal(values)) => {
                let mut name = String::with_capacity(values.len());
                for &value in values {
                    name.push(char::from(u8::try_from(value).unwrap_or(b'?')));
                }
                write!(f, "use <{name}>")
            },
            (_, ArrayExpr::Literal(values)) if is_displayable(values) => {
                write!(f, "use \"")?;
                for &value in values {
                    match char::from(u8::try_from(value).unwrap_or(b'?')) {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        other => f.write_char(other)?,
                    }
                }
                write!(f, "\"")
            },
            (_, target) => write!(f, "use {target}"),
        }
    }
}
