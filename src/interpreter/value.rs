use std::rc::Rc;

use crate::{
    ast::{ArithmeticOp, ArrayDescriptor, CompareOp, FunctionDef},
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
};

/// The storage discipline behind a runtime value.
#[derive(Debug, Clone)]
pub enum Storage {
    /// An array that may grow past its declared minimum length.
    Growable(Vec<i32>),
    /// An array whose length is fixed for its whole lifetime.
    Fixed(Box<[i32]>),
    /// A shared, immutable function definition.
    Function(Rc<FunctionDef>),
}

/// A runtime value: array storage plus the declared lower bound on its
/// observable length.
///
/// The invariants are:
/// - for `Fixed` storage, `length == minimum`, always;
/// - for `Growable` storage, `length >= minimum`, always;
/// - `minimum` is set at construction and never changed by assignment.
///
/// Values have copy semantics: every read of a binding produces a fresh,
/// independently owned buffer. Only function definitions are shared.
#[derive(Debug, Clone)]
pub struct Value {
    /// The backing storage.
    pub storage: Storage,
    /// The declared lower bound on the observable length.
    pub minimum: usize,
}

impl Value {
    /// Creates a growable value whose minimum is its current length.
    ///
    /// ## Example
    /// ```
    /// use arrai::interpreter::value::Value;
    ///
    /// let value = Value::growable(vec![1, 2, 3]);
    ///
    /// assert_eq!(value.len(), 3);
    /// assert_eq!(value.minimum, 3);
    /// ```
    #[must_use]
    pub fn growable(values: Vec<i32>) -> Self {
        Self { minimum: values.len(),
               storage: Storage::Growable(values), }
    }

    /// Creates a fixed-size value from its contents.
    #[must_use]
    pub fn fixed(values: Vec<i32>) -> Self {
        Self { minimum: values.len(),
               storage: Storage::Fixed(values.into_boxed_slice()), }
    }

    /// The zero-length array, returned by functions without an explicit
    /// `return` and by effect-only builtins.
    #[must_use]
    pub fn empty() -> Self {
        Self::fixed(Vec::new())
    }

    /// Wraps a shared function definition as a value.
    #[must_use]
    pub const fn function(def: Rc<FunctionDef>) -> Self {
        Self { storage: Storage::Function(def),
               minimum: 0, }
    }

    /// The current storage length. A function value has length 0.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the storage is currently empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the value holds a function definition.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self.storage, Storage::Function(..))
    }

    /// The elements of the value; empty for a function value.
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        match &self.storage {
            Storage::Growable(values) => values.as_slice(),
            Storage::Fixed(values) => values,
            Storage::Function(_) => &[],
        }
    }

    /// The elements of the value, or an error if it holds a function.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    pub fn as_ints(&self, line: usize) -> EvalResult<&[i32]> {
        match &self.storage {
            Storage::Function(_) => Err(RuntimeError::FunctionAsArray { line }),
            _ => Ok(self.as_slice()),
        }
    }

    /// The function definition, when the value holds one.
    #[must_use]
    pub fn as_function(&self) -> Option<&Rc<FunctionDef>> {
        match &self.storage {
            Storage::Function(def) => Some(def),
            _ => None,
        }
    }

    /// Builds a value shaped by a descriptor, optionally coercing an
    /// initializer.
    ///
    /// The construction rules are:
    /// - `[n]` with a value of length `n`: fixed storage; any other length
    ///   is an error.
    /// - `[n]` or `[]` without a value: error, a static array needs one.
    /// - `[n+]` with a value: growable with `minimum = n`; the value must
    ///   be at least `n` long.
    /// - `[n+]` without a value: `n` zeroes, `minimum = n`.
    /// - `[+]` with a value: growable with `minimum` = the value's length.
    /// - `[+]` without a value: empty, `minimum = 0`.
    /// - `[]` with a value: the value is adopted unchanged.
    ///
    /// # Parameters
    /// - `descriptor`: The declared shape.
    /// - `value`: The initializer, when present.
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Errors
    /// See the rules above; function values are rejected outright.
    ///
    /// ## Example
    /// ```
    /// use arrai::{
    ///     ast::ArrayDescriptor,
    ///     interpreter::value::Value,
    /// };
    ///
    /// // let x: [2+] = [1, 2, 3]
    /// let descriptor = ArrayDescriptor { size:     Some(2),
    ///                                    can_grow: true, };
    /// let value =
    ///     Value::from_descriptor(&descriptor, Some(Value::growable(vec![1, 2, 3])), 1).unwrap();
    ///
    /// assert_eq!(value.len(), 3);
    /// assert_eq!(value.minimum, 2);
    /// ```
    pub fn from_descriptor(descriptor: &ArrayDescriptor,
                           value: Option<Self>,
                           line: usize)
                           -> EvalResult<Self> {
        match value {
            Some(source) => {
                if source.is_function() {
                    return Err(RuntimeError::FunctionAsArray { line });
                }
                let length = source.len();
                match (descriptor.can_grow, descriptor.size) {
                    (true, size) => {
                        let minimum = size.unwrap_or(length);
                        if length < minimum {
                            return Err(RuntimeError::BelowMinimum { minimum,
                                                                    length,
                                                                    line });
                        }
                        Ok(Self { storage: Storage::Growable(source.as_slice().to_vec()),
                                  minimum })
                    },
                    (false, Some(size)) => {
                        if length != size {
                            return Err(RuntimeError::FixedSizeMismatch { expected: size,
                                                                         found: length,
                                                                         line });
                        }
                        Ok(Self::fixed(source.as_slice().to_vec()))
                    },
                    (false, None) => Ok(source),
                }
            },
            None => match (descriptor.can_grow, descriptor.size) {
                (true, Some(size)) => Ok(Self { storage: Storage::Growable(vec![0; size]),
                                                minimum: size, }),
                (true, None) => Ok(Self { storage: Storage::Growable(Vec::new()),
                                          minimum: 0, }),
                (false, _) => Err(RuntimeError::StaticWithoutValue { line }),
            },
        }
    }

    /// Assigns another value into this binding, enforcing the length
    /// contract.
    ///
    /// - Growable destination: the source must be at least `minimum` long;
    ///   the contents are replaced and `minimum` is left unchanged.
    /// - Fixed destination: the source length must equal the fixed size;
    ///   the contents are overwritten in place.
    /// - Function destination: only another function may be assigned.
    ///
    /// # Parameters
    /// - `source`: The assigned value.
    /// - `line`: Source code line number for error reporting.
    ///
    /// ## Example
    /// ```
    /// use arrai::{
    ///     ast::ArrayDescriptor,
    ///     interpreter::value::Value,
    /// };
    ///
    /// // let g: [2+] = [1, 2]; g = [1, 2, 3, 4];
    /// let descriptor = ArrayDescriptor { size:     Some(2),
    ///                                    can_grow: true, };
    /// let mut g =
    ///     Value::from_descriptor(&descriptor, Some(Value::growable(vec![1, 2])), 1).unwrap();
    ///
    /// g.assign(&Value::growable(vec![1, 2, 3, 4]), 2).unwrap();
    /// assert_eq!(g.len(), 4);
    /// assert_eq!(g.minimum, 2);
    ///
    /// // Shrinking below the minimum is rejected.
    /// assert!(g.assign(&Value::growable(vec![1]), 3).is_err());
    /// ```
    pub fn assign(&mut self, source: &Self, line: usize) -> EvalResult<()> {
        let minimum = self.minimum;
        match (&mut self.storage, &source.storage) {
            (Storage::Function(dest), Storage::Function(def)) => {
                *dest = Rc::clone(def);
                Ok(())
            },
            (Storage::Function(_), _) | (_, Storage::Function(_)) => {
                Err(RuntimeError::AssignTypeMismatch { line })
            },
            (Storage::Growable(dest), _) => {
                let values = source.as_ints(line)?;
                if values.len() < minimum {
                    return Err(RuntimeError::BelowMinimum { minimum,
                                                            length: values.len(),
                                                            line });
                }
                *dest = values.to_vec();
                Ok(())
            },
            (Storage::Fixed(dest), _) => {
                let values = source.as_ints(line)?;
                if values.len() != minimum {
                    return Err(RuntimeError::FixedSizeMismatch { expected: minimum,
                                                                 found: values.len(),
                                                                 line });
                }
                dest.copy_from_slice(values);
                Ok(())
            },
        }
    }

    /// Applies an elementwise arithmetic operator to two values of equal
    /// length.
    ///
    /// Integer arithmetic wraps on overflow. Division by zero is an error.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `other`: The right operand.
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Errors
    /// `LengthMismatch` when the operand lengths differ; `DivisionByZero`.
    ///
    /// ## Example
    /// ```
    /// use arrai::{
    ///     ast::ArithmeticOp,
    ///     interpreter::value::Value,
    /// };
    ///
    /// let left = Value::growable(vec![1, 2, 3]);
    /// let right = Value::growable(vec![1, 2, 3]);
    ///
    /// let sum = left.arithmetic(ArithmeticOp::Add, &right, 1).unwrap();
    /// assert_eq!(sum.as_slice(), &[2, 4, 6]);
    /// ```
    pub fn arithmetic(&self, op: ArithmeticOp, other: &Self, line: usize) -> EvalResult<Self> {
        let left = self.as_ints(line)?;
        let right = other.as_ints(line)?;

        if left.len() != right.len() {
            return Err(RuntimeError::LengthMismatch { operation: operation_name(op),
                                                      left: left.len(),
                                                      right: right.len(),
                                                      line });
        }

        let mut values = Vec::with_capacity(left.len());
        for (a, b) in left.iter().zip(right) {
            values.push(match op {
                            ArithmeticOp::Add => a.wrapping_add(*b),
                            ArithmeticOp::Sub => a.wrapping_sub(*b),
                            ArithmeticOp::Mul => a.wrapping_mul(*b),
                            ArithmeticOp::Div => {
                                if *b == 0 {
                                    return Err(RuntimeError::DivisionByZero { line });
                                }
                                a.wrapping_div(*b)
                            },
                        });
        }

        Ok(Self::fixed(values))
    }

    /// Applies a comparison operator.
    ///
    /// Two values of different lengths always compare `false`. Otherwise
    /// the relation must hold for **every** element pair — including `!=`,
    /// which is true only when all pairs differ.
    ///
    /// ## Example
    /// ```
    /// use arrai::{
    ///     ast::CompareOp,
    ///     interpreter::value::Value,
    /// };
    ///
    /// let left = Value::growable(vec![1, 2]);
    /// let right = Value::growable(vec![1, 3]);
    ///
    /// assert!(!left.compare(CompareOp::Eq, &right));
    /// // Not all pairs differ, so != is false as well.
    /// assert!(!left.compare(CompareOp::Ne, &right));
    /// ```
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Self) -> bool {
        let left = self.as_slice();
        let right = other.as_slice();

        if left.len() != right.len() {
            return false;
        }

        match op {
            CompareOp::Eq => left.iter().zip(right).all(|(a, b)| a == b),
            CompareOp::Ne => left.iter().zip(right).all(|(a, b)| a != b),
            CompareOp::Lt => left.iter().zip(right).all(|(a, b)| a < b),
            CompareOp::Le => left.iter().zip(right).all(|(a, b)| a <= b),
            CompareOp::Gt => left.iter().zip(right).all(|(a, b)| a > b),
            CompareOp::Ge => left.iter().zip(right).all(|(a, b)| a >= b),
        }
    }
}

/// The verb used in length-mismatch error messages.
const fn operation_name(op: ArithmeticOp) -> &'static str {
    match op {
        ArithmeticOp::Add => "add",
        ArithmeticOp::Sub => "subtract",
        ArithmeticOp::Mul => "multiply",
        ArithmeticOp::Div => "divide",
    }
}

/// Tests whether every element is a byte that renders as text: tab,
/// newline, carriage return, or a printable ASCII character.
///
/// `print` writes such arrays as raw bytes and everything else in the
/// canonical `[ e0, e1, … ]` form.
#[must_use]
pub fn is_displayable(values: &[i32]) -> bool {
    values.iter().all(|&value| matches!(value, 9 | 10 | 13 | 32..=126))
}

/// Renders elements as raw bytes, truncating each integer to `u8`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().map(|&value| value as u8).collect()
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ ")?;

        for (index, value) in self.as_slice().iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }

        write!(f, " ]")
    }
}
