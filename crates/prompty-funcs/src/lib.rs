//! Function registry and builtins for prompty expressions.
//!
//! Expression calls like `upper(user.name)` dispatch through a
//! [`FunctionRegistry`]: a one-shot table of named callables with arity
//! bounds. [`FunctionRegistry::with_builtins`] provides the standard set
//! covering strings, collections, datetimes, type conversion, and fallback
//! utilities; hosts can register additional functions before first use.
//!
//! # Usage
//!
//! ```rust
//! use prompty_funcs::FunctionRegistry;
//! use prompty_value::Value;
//!
//! let registry = FunctionRegistry::with_builtins();
//! let result = registry.call("upper", &[Value::from("hello")]).unwrap();
//! assert_eq!(result, Value::from("HELLO"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builtins;
mod error;
mod registry;

pub use error::{FuncError, FuncResult};
pub use registry::{FuncHandler, FunctionRegistry};
