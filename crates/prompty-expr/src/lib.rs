//! Expression language for prompty `eval=` attributes.
//!
//! A small dynamically-typed language used by conditionals, switch cases,
//! and anywhere else a template needs a computed value: identifiers with
//! dotted paths, string/number/bool/nil literals, `&& || !`, equality and
//! ordered comparison, and calls into the function registry.
//!
//! ```rust
//! use prompty_expr::evaluate_bool;
//! use prompty_funcs::FunctionRegistry;
//! use prompty_value::MapContext;
//!
//! let mut ctx = MapContext::new();
//! ctx.insert("n", 7);
//! let funcs = FunctionRegistry::with_builtins();
//! assert!(evaluate_bool("n > 5 && n < 10", &ctx, &funcs).unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod ast;
mod error;
mod eval;
mod parser;
mod token;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{ExprError, ExprResult};
pub use eval::{eval_expr, evaluate, evaluate_bool};
pub use parser::parse;
