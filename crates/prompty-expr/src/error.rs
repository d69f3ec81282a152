//! Error types for the expression language.

use prompty_funcs::FuncError;
use thiserror::Error;

/// Result type for expression operations
pub type ExprResult<T> = std::result::Result<T, ExprError>;

/// Errors from tokenizing, parsing, or evaluating an expression.
///
/// Offsets are byte positions within the expression string; the executor
/// maps them back to the enclosing tag's source position.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExprError {
    /// Expression source is empty or all whitespace
    #[error("empty expression")]
    EmptyExpression,

    /// Character or token that cannot appear here
    #[error("unexpected {found} at offset {at} in expression")]
    UnexpectedToken { found: String, at: usize },

    /// Expression ended mid-production
    #[error("unexpected end of expression")]
    UnexpectedEof,

    /// A closing parenthesis was required
    #[error("expected ')' at offset {at} in expression")]
    ExpectedRParen { at: usize },

    /// Malformed numeric literal
    #[error("invalid number {text:?} at offset {at} in expression")]
    InvalidNumber { text: String, at: usize },

    /// String literal never closed
    #[error("unterminated string at offset {at} in expression")]
    UnterminatedStr { at: usize },

    /// Ordered comparison between incompatible types
    #[error("cannot compare {left} with {right}")]
    TypeMismatch { left: &'static str, right: &'static str },

    /// Function registry failure (unknown function, arity, argument types)
    #[error(transparent)]
    Func(#[from] FuncError),
}
