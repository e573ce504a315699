use std::{io::Write, rc::Rc};

use crate::{
    ast::{
        Arithmetic, ArrayExpr, Body, Condition, Expression, ForLoop, FunctionCall, FunctionDef,
        IfChain, Postfix, Primary, Statement, VarBinding, VarDecl, WhileLoop,
    },
    error::RuntimeError,
    interpreter::{
        evaluator::{builtin, scope::Scope},
        value::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// [`RuntimeError`] describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the interpreter state for one run.
///
/// The context owns the root scope (which holds every loaded function
/// definition), the list of files already included through `use`, and the
/// writer that `print` targets.
///
/// ## Usage
///
/// A `Context` is created once per program run. [`Context::run_source`]
/// drives the whole pipeline; the `eval_*` methods below implement the
/// tree walk and can be used directly against a scope handle.
pub struct Context {
    /// The root scope; function definitions land here.
    pub root:              Rc<Scope>,
    /// Filenames already processed by the module loader.
    pub(crate) loaded:     Vec<String>,
    /// Where `print` and `clear` write.
    pub(crate) out:        Box<dyn Write>,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a context whose output is the process stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    /// Creates a context writing program output to `out`.
    ///
    /// Tests use this to capture what `print` produces.
    #[must_use]
    pub fn with_writer(out: Box<dyn Write>) -> Self {
        Self { root: Scope::root(),
               loaded: Vec::new(),
               out }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// The primary is evaluated first (an arithmetic tree or an array
    /// expression), then every postfix operation is applied left to right
    /// to the evolving value.
    ///
    /// # Parameters
    /// - `expression`: Expression to evaluate.
    /// - `scope`: The scope active at the expression.
    ///
    /// # Returns
    /// The computed [`Value`].
    ///
    /// ## Example
    /// ```
    /// use arrai::{
    ///     ast::Expression,
    ///     interpreter::evaluator::core::Context,
    /// };
    ///
    /// let mut context = Context::new();
    /// let scope = context.root.clone();
    ///
    /// let expr = Expression::from_ints(vec![4, 5], 1);
    /// let value = context.eval_expression(&expr, &scope).unwrap();
    ///
    /// assert_eq!(value.as_slice(), &[4, 5]);
    /// ```
    pub fn eval_expression(&mut self,
                           expression: &Expression,
                           scope: &Rc<Scope>)
                           -> EvalResult<Value> {
        let value = match &expression.primary {
            Primary::Arithmetic(arithmetic) => {
                self.eval_arithmetic(arithmetic, scope, expression.line)?
            },
            Primary::Array(array) => self.eval_array(array, scope, expression.line)?,
        };
        self.apply_postfix(value, &expression.postfix, scope, expression.line)
    }

    /// Evaluates an array expression.
    ///
    /// - A literal produces a fresh growable value whose minimum is its
    ///   length.
    /// - An identifier produces a copy of the referenced binding. When the
    ///   binding holds a function, the function value itself is produced;
    ///   array-context operations on it fail later.
    /// - A call dispatches through [`Context::eval_call`].
    pub(crate) fn eval_array(&mut self,
                             array: &ArrayExpr,
                             scope: &Rc<Scope>,
                             line: usize)
                             -> EvalResult<Value> {
        match array {
            ArrayExpr::Literal(values) => Ok(Value::growable(values.clone())),
            ArrayExpr::Variable(name) => scope.get(name, line),
            ArrayExpr::Call(call) => self.eval_call(call, scope),
        }
    }

    fn eval_arithmetic(&mut self,
                       arithmetic: &Arithmetic,
                       scope: &Rc<Scope>,
                       line: usize)
                       -> EvalResult<Value> {
        let left = self.eval_expression(&arithmetic.left, scope)?;
        let right = self.eval_expression(&arithmetic.right, scope)?;
        left.arithmetic(arithmetic.op, &right, line)
    }

    fn apply_postfix(&mut self,
                     mut value: Value,
                     postfix: &[Postfix],
                     scope: &Rc<Scope>,
                     line: usize)
                     -> EvalResult<Value> {
        for operation in postfix {
            value = match operation {
                Postfix::Range(range) => self.eval_range(&value, range, scope, line)?,
                Postfix::Method(method) => self.eval_method(&value, method, scope)?,
            };
        }
        Ok(value)
    }

    /// Evaluates a single statement.
    ///
    /// # Returns
    /// `Some(value)` when the statement (or a statement nested in it)
    /// executed a `return`; the value must propagate out of the enclosing
    /// function immediately. `None` otherwise.
    pub fn eval_statement(&mut self,
                          statement: &Statement,
                          scope: &Rc<Scope>)
                          -> EvalResult<Option<Value>> {
        match statement {
            Statement::Binding(binding) => {
                self.eval_binding(binding, scope)?;
                Ok(None)
            },
            Statement::For(for_loop) => self.eval_for(for_loop, scope),
            Statement::While(while_loop) => self.eval_while(while_loop, scope),
            Statement::If(chain) => Ok(self.eval_if(chain, scope)?.0),
            Statement::Call(call) => {
                self.eval_call(call, scope)?;
                Ok(None)
            },
            Statement::Return(ret) => Ok(Some(self.eval_expression(&ret.value, scope)?)),
        }
    }

    /// Evaluates the statements of a body, in order, in the given scope.
    ///
    /// Bodies do not open a scope of their own; the constructs around them
    /// (calls, loops, `if` chains) decide the frame they run in.
    ///
    /// # Returns
    /// The early-return value, if any statement produced one.
    pub fn eval_body(&mut self, body: &Body, scope: &Rc<Scope>) -> EvalResult<Option<Value>> {
        for statement in &body.statements {
            if let Some(value) = self.eval_statement(statement, scope)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn eval_binding(&mut self, binding: &VarBinding, scope: &Rc<Scope>) -> EvalResult<()> {
        match binding {
            VarBinding::Declaration(decl) => self.eval_declaration(decl, scope),
            VarBinding::Assignment(assign) => {
                if !scope.has_recursive(&assign.name) {
                    return Err(RuntimeError::UndefinedVariableAssignment {
                        name: assign.name.clone(),
                        line: assign.line,
                    });
                }
                let value = self.eval_expression(&assign.value, scope)?;
                scope.set(&assign.name, &value, assign.line)
            },
        }
    }

    fn eval_declaration(&mut self, decl: &VarDecl, scope: &Rc<Scope>) -> EvalResult<()> {
        let value = match &decl.value {
            Some(expression) => Some(self.eval_expression(expression, scope)?),
            None => None,
        };
        let value = Value::from_descriptor(&decl.descriptor, value, decl.line)?;
        scope.define(&decl.name, value);
        Ok(())
    }

    /// Evaluates a `for` loop.
    ///
    /// The iterable is evaluated once in the surrounding scope. Each
    /// iteration gets a fresh child scope in which the element name is
    /// bound to a one-element array.
    fn eval_for(&mut self, for_loop: &ForLoop, scope: &Rc<Scope>) -> EvalResult<Option<Value>> {
        let iterable = self.eval_expression(&for_loop.iterable, scope)?;
        let elements = iterable.as_ints(for_loop.line)?.to_vec();

        for element in elements {
            let child = Scope::child(scope);
            child.define(&for_loop.element, Value::fixed(vec![element]));
            if let Some(value) = self.eval_body(&for_loop.body, &child)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }

    /// Evaluates a `while` loop.
    ///
    /// One child scope serves the whole loop: the condition and every
    /// iteration share it. An if-let condition therefore defines its
    /// variable once; later iterations keep the first binding.
    fn eval_while(&mut self,
                  while_loop: &WhileLoop,
                  scope: &Rc<Scope>)
                  -> EvalResult<Option<Value>> {
        let child = Scope::child(scope);

        while self.eval_condition(&while_loop.condition, &child)? {
            if let Some(value) = self.eval_body(&while_loop.body, &child)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }

    /// Evaluates an `if` chain.
    ///
    /// The chain's child scope hosts the condition (so an if-let binding
    /// is visible in the taken branch) and the branch bodies.
    ///
    /// # Returns
    /// The early-return value and whether any branch was taken.
    fn eval_if(&mut self,
               chain: &IfChain,
               scope: &Rc<Scope>)
               -> EvalResult<(Option<Value>, bool)> {
        let child = Scope::child(scope);

        if self.eval_condition(&chain.condition, &child)? {
            return Ok((self.eval_body(&chain.body, &child)?, true));
        }

        if let Some(else_if) = &chain.else_if {
            let result = self.eval_if(else_if, &child)?;
            if result.1 {
                return Ok(result);
            }
        }

        if let Some(else_body) = &chain.else_body {
            return Ok((self.eval_body(else_body, &child)?, true));
        }

        Ok((None, false))
    }

    /// Evaluates an `if`/`while` condition to a boolean.
    ///
    /// A comparison evaluates both sides and applies the operator. An
    /// if-let declaration succeeds when the initializer's length satisfies
    /// the descriptor (equal for a fixed size, at least the size for a
    /// growable one, always for `[+]`, never for `[]`); on success the
    /// variable is defined in the branch scope.
    fn eval_condition(&mut self, condition: &Condition, scope: &Rc<Scope>) -> EvalResult<bool> {
        match condition {
            Condition::Compare(compare) => {
                let left = self.eval_expression(&compare.left, scope)?;
                let right = self.eval_expression(&compare.right, scope)?;
                Ok(left.compare(compare.op, &right))
            },
            Condition::Declaration(decl) => match &decl.value {
                None => {
                    self.eval_declaration(decl, scope)?;
                    Ok(true)
                },
                Some(expression) => {
                    let value = self.eval_expression(expression, scope)?;
                    let length = value.len();
                    let taken = match (decl.descriptor.size, decl.descriptor.can_grow) {
                        (Some(size), false) => length == size,
                        (Some(size), true) => length >= size,
                        (None, true) => true,
                        (None, false) => false,
                    };
                    if taken {
                        let value =
                            Value::from_descriptor(&decl.descriptor, Some(value), decl.line)?;
                        scope.define(&decl.name, value);
                    }
                    Ok(taken)
                },
            },
        }
    }

    /// Evaluates a function call.
    ///
    /// Arguments are evaluated in the caller's scope first. A name bound
    /// in the scope chain dispatches to the user-defined function it
    /// holds; otherwise the builtin table is consulted. User definitions
    /// shadow builtins.
    ///
    /// # Errors
    /// - `NotAFunction` when the name is bound to an array.
    /// - `UndefinedFunction` when the name matches nothing.
    /// - Any error raised by the callee.
    pub fn eval_call(&mut self, call: &FunctionCall, scope: &Rc<Scope>) -> EvalResult<Value> {
        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.eval_expression(argument, scope)?);
        }

        if scope.has_recursive(&call.name) {
            let bound = scope.get(&call.name, call.line)?;
            let Some(def) = bound.as_function() else {
                return Err(RuntimeError::NotAFunction { name: call.name.clone(),
                                                        line: call.line, });
            };
            let def = Rc::clone(def);
            return self.call_function(&def, arguments, scope, call.line);
        }

        match builtin::dispatch(self, &call.name, &arguments, call.line)? {
            Some(value) => Ok(value),
            None => Err(RuntimeError::UndefinedFunction { name: call.name.clone(),
                                                          line: call.line, }),
        }
    }

    /// Invokes a user-defined function.
    ///
    /// The callee's scope is a child of the *caller's* scope. Each
    /// parameter is defined by coercing the corresponding argument through
    /// the parameter's descriptor, which enforces the length contract at
    /// the call boundary.
    ///
    /// # Returns
    /// The early-return value, or the zero-length array when the body
    /// falls off the end.
    fn call_function(&mut self,
                     def: &Rc<FunctionDef>,
                     arguments: Vec<Value>,
                     caller: &Rc<Scope>,
                     line: usize)
                     -> EvalResult<Value> {
        if arguments.len() != def.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: def.name.clone(),
                                                             expected: def.params.len(),
                                                             found: arguments.len(),
                                                             line });
        }

        let scope = Scope::child(caller);
        for (param, argument) in def.params.iter().zip(arguments) {
            let value = Value::from_descriptor(&param.descriptor, Some(argument), line)?;
            scope.define(&param.name, value);
        }

        Ok(self.eval_body(&def.body, &scope)?.unwrap_or_else(Value::empty))
    }
}
