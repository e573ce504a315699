#[derive(Debug)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Tried to read a variable that was never defined.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to assign to a variable that was never defined.
    UndefinedVariableAssignment {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a name that is neither a user function nor a builtin.
    UndefinedFunction {
        /// The name that was called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a name that is bound to an array, not a function.
    NotAFunction {
        /// The name that was called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Used a function value where an array was required.
    FunctionAsArray {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The wrong number of arguments was supplied to a function or method.
    ArgumentCountMismatch {
        /// The name of the function or method.
        name:     String,
        /// How many arguments it takes.
        expected: usize,
        /// How many arguments were supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Called a method that does not exist.
    UnknownMethod {
        /// The method name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Two operands of an elementwise operation had different lengths.
    LengthMismatch {
        /// The operation being performed ("add", "subtract", ...).
        operation: &'static str,
        /// Length of the left operand.
        left:      usize,
        /// Length of the right operand.
        right:     usize,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A fixed-size array was declared without an initializer or size.
    StaticWithoutValue {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An array value was shorter than the declared minimum length.
    BelowMinimum {
        /// The declared minimum length.
        minimum: usize,
        /// The actual length.
        length:  usize,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A fixed-size array received a value of a different length.
    FixedSizeMismatch {
        /// The fixed size.
        expected: usize,
        /// The actual length.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Assignment between a function binding and an array value.
    AssignTypeMismatch {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A slice's upper bound was below its lower bound.
    InvalidRange {
        /// The resolved lower bound.
        start: usize,
        /// The resolved upper bound.
        end:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A slice reached past the end of the array.
    RangeOutOfBounds {
        /// The resolved upper bound.
        end:    usize,
        /// The length of the sliced array.
        length: usize,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A value that must be a single non-negative integer was not.
    ExpectedSingleElement {
        /// What required the value ("Array Range bound", "range", ...).
        context: &'static str,
        /// The offending value, rendered.
        found:   String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An argument was invalid or out of range.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attempted division by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A file could not be opened or read.
    FileOpen {
        /// The path that failed.
        path: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A host I/O operation failed.
    Io {
        /// Details from the host.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, line } => {
                write!(f, "Undefined variable '{name}' on line {line}.")
            },
            Self::UndefinedVariableAssignment { name, line } => {
                write!(f, "'{name}' has not been defined (line {line}).")
            },
            Self::UndefinedFunction { name, line } => {
                write!(f, "Undefined function '{name}' on line {line}.")
            },
            Self::NotAFunction { name, line } => {
                write!(f, "'{name}' must be defined as a function (line {line}).")
            },
            Self::FunctionAsArray { line } => write!(f,
                                                     "A function cannot be used as an array \
                                                      value (line {line})."),
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          line, } => {
                write!(f,
                       "'{name}' expected {expected} argument(s) but received {found} (line \
                        {line}).")
            },
            Self::UnknownMethod { name, line } => {
                write!(f, "Unknown method '{name}' on line {line}.")
            },
            Self::LengthMismatch { operation,
                                   left,
                                   right,
                                   line, } => {
                write!(f,
                       "Cannot {operation} arrays with different lengths ({left} and {right}) \
                        on line {line}.")
            },
            Self::StaticWithoutValue { line } => write!(f,
                                                        "Static array cannot be defined without \
                                                         a value (line {line})."),
            Self::BelowMinimum { minimum,
                                 length,
                                 line, } => {
                write!(f,
                       "Cannot set value. Destination minimum ({minimum}) is larger than the \
                        source's length ({length}) (line {line}).")
            },
            Self::FixedSizeMismatch { expected,
                                      found,
                                      line, } => {
                write!(f,
                       "Cannot set value. Destination length ({expected}) is not equal to the \
                        source's length ({found}) (line {line}).")
            },
            Self::AssignTypeMismatch { line } => write!(f,
                                                        "Cannot assign between a function and \
                                                         an array (line {line})."),
            Self::InvalidRange { start, end, line } => {
                write!(f,
                       "Array range upper bound ({end}) must be greater than or equal to the \
                        lower bound ({start}) (line {line}).")
            },
            Self::RangeOutOfBounds { end, length, line } => {
                write!(f,
                       "Array range bound ({end}) must be within the length of the array \
                        ({length}) (line {line}).")
            },
            Self::ExpectedSingleElement { context,
                                          found,
                                          line, } => {
                write!(f,
                       "{context} must evaluate to a single non-negative value, but found \
                        {found} (line {line}).")
            },
            Self::InvalidArgument { details, line } => {
                write!(f, "Invalid argument: {details} (line {line}).")
            },
            Self::DivisionByZero { line } => write!(f, "Division by zero on line {line}."),
            Self::FileOpen { path, line } => {
                write!(f, "Failed to open file '{path}' (line {line}).")
            },
            Self::Io { details, line } => write!(f, "I/O error: {details} (line {line})."),
        }
    }
}

impl std::error::Error for RuntimeError {}
