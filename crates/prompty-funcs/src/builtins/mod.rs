//! The builtin function set.
//!
//! Grouped by domain: string manipulation, collection access, datetime
//! arithmetic, type introspection/conversion, and utility fallbacks.

mod collection;
mod datetime;
mod strings;
mod types;
mod util;

use crate::error::FuncResult;
use crate::registry::FunctionRegistry;

/// Register every builtin.
///
/// Only fails when a name is already taken, which cannot happen on a fresh
/// registry.
pub(crate) fn register_all(registry: &mut FunctionRegistry) -> FuncResult<()> {
    strings::register(registry)?;
    collection::register(registry)?;
    datetime::register(registry)?;
    types::register(registry)?;
    util::register(registry)?;
    Ok(())
}
