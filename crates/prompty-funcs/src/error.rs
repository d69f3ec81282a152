//! Error types for function registration and calls.

use thiserror::Error;

/// Result type for function operations
pub type FuncResult<T> = std::result::Result<T, FuncError>;

/// Errors raised by the registry or by builtin function bodies
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FuncError {
    /// Call to a name with no registered function
    #[error("unknown function '{name}'")]
    NotFound { name: String },

    /// Fewer arguments than the function's minimum
    #[error("function '{name}' requires at least {min} argument(s), got {got}")]
    TooFewArgs { name: String, min: usize, got: usize },

    /// More arguments than the function's maximum
    #[error("function '{name}' takes at most {max} argument(s), got {got}")]
    TooManyArgs { name: String, max: usize, got: usize },

    /// Second registration under the same name
    #[error("function '{name}' is already registered")]
    AlreadyExists { name: String },

    /// Argument must be a string (or string-like)
    #[error("function '{name}' expected a {expected}, got {got}")]
    ExpectedString { name: String, expected: &'static str, got: &'static str },

    /// Argument must be a time value, timestamp, or parsable date string
    #[error("function '{name}' expected a time value, got {got}")]
    ExpectedTime { name: String, got: &'static str },

    /// Argument must be an integer
    #[error("function '{name}' expected an integer, got {got}")]
    ExpectedInteger { name: String, got: String },

    /// Date layout argument must be a string
    #[error("function '{name}' expected a layout string, got {got}")]
    ExpectedTimeLayout { name: String, got: &'static str },

    /// Date string did not match the layout or any auto-detected format
    #[error("unrecognized time format: {input:?}")]
    InvalidTimeFormat { input: String },
}

impl FuncError {
    /// Build an [`FuncError::ExpectedString`] with a custom expectation label
    pub fn expected(name: &str, expected: &'static str, got: &'static str) -> Self {
        FuncError::ExpectedString { name: name.to_string(), expected, got }
    }
}
