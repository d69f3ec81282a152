//! Utility fallback builtins.

use prompty_value::Value;

use crate::error::FuncResult;
use crate::registry::FunctionRegistry;

pub(crate) fn register(registry: &mut FunctionRegistry) -> FuncResult<()> {
    registry.register("default", 2, Some(2), default)?;
    registry.register("coalesce", 1, None, coalesce)?;
    Ok(())
}

/// `default(value, fallback)`: the value unless it is nil
fn default(args: &[Value]) -> FuncResult<Value> {
    if args[0].is_null() {
        Ok(args[1].clone())
    } else {
        Ok(args[0].clone())
    }
}

/// `coalesce(…)`: the first non-nil argument, or nil
fn coalesce(args: &[Value]) -> FuncResult<Value> {
    Ok(args.iter().find(|v| !v.is_null()).cloned().unwrap_or(Value::Null))
}
