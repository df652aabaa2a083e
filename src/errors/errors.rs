use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateSymbol { .. } => "DuplicateSymbol",
            ErrorImpl::UnknownSymbol { .. } => "UnknownSymbol",
            ErrorImpl::InvalidExpression { .. } => "InvalidExpression",
            ErrorImpl::InvalidAssignment { .. } => "InvalidAssignment",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::NoMatchingOverload { .. } => "NoMatchingOverload",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::TypeError { .. } => "TypeError",
            ErrorImpl::DivisionByZero { .. } => "DivisionByZero",
            ErrorImpl::IntegerOverflow { .. } => "IntegerOverflow",
            ErrorImpl::BuiltinArguments { .. } => "BuiltinArguments",
            ErrorImpl::InputExhausted => "InputExhausted",
            ErrorImpl::InputShape { .. } => "InputShape",
            ErrorImpl::ConversionError { .. } => "ConversionError",
            ErrorImpl::CallDepthExceeded { .. } => "CallDepthExceeded",
            ErrorImpl::ValueTypeMismatch { .. } => "ValueTypeMismatch",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::DuplicateSymbol { symbol } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in this scope",
                symbol
            )),
            ErrorImpl::UnknownSymbol { symbol } => {
                ErrorTip::Suggestion(format!("`{}` is not declared", symbol))
            }
            ErrorImpl::InvalidExpression { .. } => ErrorTip::None,
            ErrorImpl::InvalidAssignment { variable } => ErrorTip::Suggestion(format!(
                "`{}` is a constant, declare it with `let` to modify it",
                variable
            )),
            ErrorImpl::ArityMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::NoMatchingOverload {
                function,
                arguments,
            } => ErrorTip::Suggestion(format!(
                "No overload of `{}` accepts ({})",
                function, arguments
            )),
            ErrorImpl::TypeMismatch { expected, received, .. } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::TypeError { .. } => ErrorTip::None,
            ErrorImpl::DivisionByZero { .. } => {
                ErrorTip::Suggestion(String::from("Check the divisor before dividing"))
            }
            ErrorImpl::IntegerOverflow { .. } => ErrorTip::Suggestion(String::from(
                "Integers are 32 bit, use a float for larger values",
            )),
            ErrorImpl::BuiltinArguments { .. } => ErrorTip::None,
            ErrorImpl::InputExhausted => ErrorTip::Suggestion(String::from(
                "The program read more input than was provided",
            )),
            ErrorImpl::InputShape { expected, .. } => {
                ErrorTip::Suggestion(format!("Provide a value of type `{}`", expected))
            }
            ErrorImpl::ConversionError { .. } => ErrorTip::None,
            ErrorImpl::CallDepthExceeded { .. } => ErrorTip::Suggestion(String::from(
                "Check for unbounded recursion or raise --max-call-depth",
            )),
            ErrorImpl::ValueTypeMismatch { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// Coarse classification of every [`ErrorImpl`].
///
/// Everything except `Runtime` is raised before evaluation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    DuplicateSymbol,
    UnknownSymbol,
    InvalidExpression,
    InvalidFunctionCall,
    TypeError,
    Runtime,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Lexical => "LexicalError",
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::DuplicateSymbol => "DuplicateSymbol",
            ErrorKind::UnknownSymbol => "UnknownSymbol",
            ErrorKind::InvalidExpression => "InvalidExpression",
            ErrorKind::InvalidFunctionCall => "InvalidFunctionCall",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::Runtime => "RuntimeError",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("symbol {symbol:?} already declared")]
    DuplicateSymbol { symbol: String },
    #[error("symbol {symbol:?} not declared")]
    UnknownSymbol { symbol: String },
    #[error("{message}")]
    InvalidExpression { message: String },
    #[error("cannot assign to constant {variable:?}")]
    InvalidAssignment { variable: String },
    #[error("function {function:?} expects {expected} arguments, received {received}")]
    ArityMismatch {
        function: String,
        expected: String,
        received: usize,
    },
    #[error("no overload of {function:?} accepts ({arguments})")]
    NoMatchingOverload { function: String, arguments: String },
    #[error("types do not match in {context}: expected {expected:?}, received {received:?}")]
    TypeMismatch {
        context: String,
        expected: String,
        received: String,
    },
    #[error("{message}")]
    TypeError { message: String },
    #[error("{operation} by zero")]
    DivisionByZero { operation: String },
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },
    #[error("invalid arguments to builtin {function:?}: {message}")]
    BuiltinArguments { function: String, message: String },
    #[error("no more input available")]
    InputExhausted,
    #[error("expected input of type {expected:?}, received {received:?}")]
    InputShape { expected: String, received: String },
    #[error("cannot convert {value:?} to {target}")]
    ConversionError { value: String, target: String },
    #[error("maximum call depth of {depth} exceeded")]
    CallDepthExceeded { depth: usize },
    #[error("value has type {received}, expected {expected}")]
    ValueTypeMismatch { expected: String, received: String },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. } => ErrorKind::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Syntax,
            ErrorImpl::DuplicateSymbol { .. } => ErrorKind::DuplicateSymbol,
            ErrorImpl::UnknownSymbol { .. } => ErrorKind::UnknownSymbol,
            ErrorImpl::InvalidExpression { .. } | ErrorImpl::InvalidAssignment { .. } => {
                ErrorKind::InvalidExpression
            }
            ErrorImpl::ArityMismatch { .. } | ErrorImpl::NoMatchingOverload { .. } => {
                ErrorKind::InvalidFunctionCall
            }
            ErrorImpl::TypeMismatch { .. } | ErrorImpl::TypeError { .. } => ErrorKind::TypeError,
            ErrorImpl::DivisionByZero { .. }
            | ErrorImpl::IntegerOverflow { .. }
            | ErrorImpl::BuiltinArguments { .. }
            | ErrorImpl::InputExhausted
            | ErrorImpl::InputShape { .. }
            | ErrorImpl::ConversionError { .. }
            | ErrorImpl::CallDepthExceeded { .. }
            | ErrorImpl::ValueTypeMismatch { .. } => ErrorKind::Runtime,
        }
    }

    /// Attaches a source position, producing a reportable [`Error`].
    pub fn at(self, position: Position) -> Error {
        Error::new(self, position)
    }
}
