//! Utility macros for the interpreter.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens
//! - `PROPAGATE_SIGNAL!` - Unwraps a normal completion or returns a control-flow signal
//!
//! These macros reduce boilerplate in the lexer and the evaluator.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for simple single-token patterns.
///
/// Generates a handler function that creates a token with the given kind
/// and advances the lexer position by the token's length.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal string value (used for length calculation)
///
/// # Example
///
/// ```ignore
/// pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            lexer.push(MK_TOKEN!(
                $kind,
                String::from($value),
                lexer.span_of($value.len())
            ));
            lexer.advance_n($value.len());
        }
    };
}

/// Evaluates to the value of a normal completion, or returns the signal of an
/// abrupt one from the enclosing function.
///
/// # Example
///
/// ```ignore
/// let condition = PROPAGATE_SIGNAL!(self.evaluate(condition)?);
/// ```
#[macro_export]
macro_rules! PROPAGATE_SIGNAL {
    ($completion:expr) => {
        match $completion {
            Completion::Normal(value) => value,
            Completion::Abrupt(signal) => return Ok(Completion::Abrupt(signal)),
        }
    };
}
