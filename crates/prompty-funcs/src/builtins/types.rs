//! Type introspection and conversion builtins.

use prompty_value::Value;

use crate::error::{FuncError, FuncResult};
use crate::registry::FunctionRegistry;

pub(crate) fn register(registry: &mut FunctionRegistry) -> FuncResult<()> {
    registry.register("toString", 1, Some(1), to_string)?;
    registry.register("toInt", 1, Some(1), to_int)?;
    registry.register("toFloat", 1, Some(1), to_float)?;
    registry.register("toBool", 1, Some(1), to_bool)?;
    registry.register("typeOf", 1, Some(1), type_of)?;
    registry.register("isNil", 1, Some(1), is_nil)?;
    registry.register("isEmpty", 1, Some(1), is_empty)?;
    Ok(())
}

fn to_string(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::from(args[0].to_string()))
}

fn to_int(args: &[Value]) -> FuncResult<Value> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(n) => Ok(Value::Int(*n as i64)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::String(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            FuncError::ExpectedInteger { name: "toInt".to_string(), got: s.clone() }
        }),
        other => Err(FuncError::ExpectedInteger {
            name: "toInt".to_string(),
            got: other.type_name().to_string(),
        }),
    }
}

fn to_float(args: &[Value]) -> FuncResult<Value> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(n) => Ok(Value::Float(*n)),
        Value::String(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            FuncError::ExpectedInteger { name: "toFloat".to_string(), got: s.clone() }
        }),
        other => Err(FuncError::ExpectedInteger {
            name: "toFloat".to_string(),
            got: other.type_name().to_string(),
        }),
    }
}

fn to_bool(args: &[Value]) -> FuncResult<Value> {
    let result = match &args[0] {
        Value::Bool(b) => *b,
        // String forms of false beat plain truthiness
        Value::String(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            !(lowered.is_empty() || lowered == "false" || lowered == "0")
        }
        other => other.is_truthy(),
    };
    Ok(Value::Bool(result))
}

fn type_of(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::from(args[0].type_name()))
}

fn is_nil(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::Bool(args[0].is_null()))
}

fn is_empty(args: &[Value]) -> FuncResult<Value> {
    let result = match &args[0] {
        Value::Null => true,
        value => value.is_empty().unwrap_or(false),
    };
    Ok(Value::Bool(result))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn conversions() {
        assert_eq!(to_string(&[Value::Int(42)]).unwrap(), Value::from("42"));
        assert_eq!(to_int(&["  17 ".into()]).unwrap(), Value::Int(17));
        assert_eq!(to_int(&[Value::Float(3.9)]).unwrap(), Value::Int(3));
        assert_eq!(to_int(&[Value::Bool(true)]).unwrap(), Value::Int(1));
        assert_eq!(to_float(&["2.5".into()]).unwrap(), Value::Float(2.5));
        assert!(to_int(&["xyz".into()]).is_err());
    }

    #[test]
    fn bool_coercion() {
        assert_eq!(to_bool(&["False".into()]).unwrap(), Value::Bool(false));
        assert_eq!(to_bool(&["0".into()]).unwrap(), Value::Bool(false));
        assert_eq!(to_bool(&["yes".into()]).unwrap(), Value::Bool(true));
        assert_eq!(to_bool(&[Value::Int(0)]).unwrap(), Value::Bool(false));
        assert_eq!(to_bool(&[Value::Null]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn introspection() {
        assert_eq!(type_of(&[Value::Null]).unwrap(), Value::from("nil"));
        assert_eq!(type_of(&[Value::Int(1)]).unwrap(), Value::from("int"));
        assert_eq!(is_nil(&[Value::Null]).unwrap(), Value::Bool(true));
        assert_eq!(is_nil(&[Value::Int(0)]).unwrap(), Value::Bool(false));
        assert_eq!(is_empty(&["".into()]).unwrap(), Value::Bool(true));
        assert_eq!(is_empty(&[Value::List(vec![])]).unwrap(), Value::Bool(true));
        assert_eq!(is_empty(&[Value::Int(0)]).unwrap(), Value::Bool(false));
    }
}
