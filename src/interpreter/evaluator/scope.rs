use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::Value},
};

/// One frame of the scope chain.
///
/// A scope owns a name → [`Value`] map and holds a weak reference to its
/// enclosing scope, so child frames can traverse their ancestors without
/// keeping dead ones alive. Lookup walks the chain outward from the frame
/// it starts in.
///
/// Frames are created for function calls, `if` chains, `while` loops, and
/// each `for` iteration; in every case the parent is the scope active at
/// evaluation time. Function bodies therefore see their *caller's*
/// bindings — dynamic scoping is the language's rule.
pub struct Scope {
    variables: RefCell<HashMap<String, Value>>,
    parent:    Weak<Scope>,
}

impl Scope {
    /// Creates the root frame, which has no parent.
    #[must_use]
    pub fn root() -> Rc<Self> {
        Rc::new(Self { variables: RefCell::new(HashMap::new()),
                       parent:    Weak::new(), })
    }

    /// Creates a child frame of `parent`.
    ///
    /// ## Example
    /// ```
    /// use arrai::interpreter::{evaluator::scope::Scope, value::Value};
    ///
    /// let root = Scope::root();
    /// root.define("x", Value::growable(vec![7]));
    ///
    /// let child = Scope::child(&root);
    /// assert!(!child.has("x"));
    /// assert!(child.has_recursive("x"));
    /// ```
    #[must_use]
    pub fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { variables: RefCell::new(HashMap::new()),
                       parent:    Rc::downgrade(parent), })
    }

    /// Tests whether `name` is defined in this frame itself.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.variables.borrow().contains_key(name)
    }

    /// Tests whether `name` is defined in this frame or any ancestor.
    #[must_use]
    pub fn has_recursive(&self, name: &str) -> bool {
        self.has(name) || self.parent.upgrade().is_some_and(|parent| parent.has_recursive(name))
    }

    /// Returns a copy of the nearest binding of `name`.
    ///
    /// Reading a binding always copies: the language has value semantics,
    /// and no aliasing is observable through names. Function values share
    /// their definition via `Rc`.
    ///
    /// # Parameters
    /// - `name`: The looked-up name.
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Errors
    /// `UndefinedVariable` when no frame in the chain defines `name`.
    pub fn get(&self, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(value) = self.variables.borrow().get(name) {
            return Ok(value.clone());
        }
        match self.parent.upgrade() {
            Some(parent) => parent.get(name, line),
            None => Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                          line }),
        }
    }

    /// Defines `name` in this frame. First write wins: when the name is
    /// already present the call is a no-op.
    pub fn define(&self, name: &str, value: Value) {
        self.variables
            .borrow_mut()
            .entry(name.to_string())
            .or_insert(value);
    }

    /// Assigns into the nearest frame that defines `name`, applying the
    /// value's length contract in place.
    ///
    /// # Parameters
    /// - `name`: The assigned name.
    /// - `source`: The assigned value.
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Errors
    /// `UndefinedVariableAssignment` when no frame defines `name`, or any
    /// error from [`Value::assign`].
    ///
    /// ## Example
    /// ```
    /// use arrai::interpreter::{evaluator::scope::Scope, value::Value};
    ///
    /// let root = Scope::root();
    /// root.define("x", Value::growable(vec![1, 2]));
    ///
    /// let child = Scope::child(&root);
    /// child.set("x", &Value::growable(vec![3, 4, 5]), 1).unwrap();
    ///
    /// assert_eq!(root.get("x", 1).unwrap().as_slice(), &[3, 4, 5]);
    /// ```
    pub fn set(&self, name: &str, source: &Value, line: usize) -> EvalResult<()> {
        if let Some(existing) = self.variables.borrow_mut().get_mut(name) {
            return existing.assign(source, line);
        }
        match self.parent.upgrade() {
            Some(parent) => parent.set(name, source, line),
            None => Err(RuntimeError::UndefinedVariableAssignment { name: name.to_string(),
                                                                    line }),
        }
    }
}
