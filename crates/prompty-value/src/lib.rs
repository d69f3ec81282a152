//! Dynamic values and context access for prompty templates.
//!
//! Template data is dynamically typed: a [`Value`] is nil, a bool, a
//! number, a string, a list, a string-keyed mapping, or a datetime.
//! Truthiness is total (defined for every variant) and numeric promotion
//! between integers and floats happens only at comparison boundaries.
//!
//! [`ContextReader`] is the abstract reader the expression evaluator and
//! the tag resolvers use to look up dotted paths in the execution context.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod convert;
mod reader;
mod value;

pub use reader::{ContextReader, MapContext};
pub use value::Value;
