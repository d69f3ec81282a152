//! Collection access builtins.

use prompty_value::Value;

use crate::error::{FuncError, FuncResult};
use crate::registry::FunctionRegistry;

pub(crate) fn register(registry: &mut FunctionRegistry) -> FuncResult<()> {
    registry.register("len", 1, Some(1), len)?;
    registry.register("first", 1, Some(1), first)?;
    registry.register("last", 1, Some(1), last)?;
    registry.register("keys", 1, Some(1), keys)?;
    registry.register("values", 1, Some(1), values)?;
    registry.register("has", 2, Some(2), has)?;
    Ok(())
}

fn len(args: &[Value]) -> FuncResult<Value> {
    match &args[0] {
        Value::Null => Ok(Value::Int(0)),
        value => match value.len() {
            Some(n) => Ok(Value::Int(n as i64)),
            None => Err(FuncError::expected("len", "string, list, or map", value.type_name())),
        },
    }
}

fn first(args: &[Value]) -> FuncResult<Value> {
    match &args[0] {
        Value::List(items) => Ok(items.first().cloned().unwrap_or(Value::Null)),
        Value::String(s) => {
            Ok(s.chars().next().map(|c| Value::from(c.to_string())).unwrap_or(Value::Null))
        }
        other => Err(FuncError::expected("first", "list or string", other.type_name())),
    }
}

fn last(args: &[Value]) -> FuncResult<Value> {
    match &args[0] {
        Value::List(items) => Ok(items.last().cloned().unwrap_or(Value::Null)),
        Value::String(s) => {
            Ok(s.chars().last().map(|c| Value::from(c.to_string())).unwrap_or(Value::Null))
        }
        other => Err(FuncError::expected("last", "list or string", other.type_name())),
    }
}

fn keys(args: &[Value]) -> FuncResult<Value> {
    match &args[0] {
        Value::Map(map) => Ok(Value::List(map.keys().map(|k| Value::from(k.as_str())).collect())),
        other => Err(FuncError::expected("keys", "map", other.type_name())),
    }
}

fn values(args: &[Value]) -> FuncResult<Value> {
    match &args[0] {
        Value::Map(map) => Ok(Value::List(map.values().cloned().collect())),
        other => Err(FuncError::expected("values", "map", other.type_name())),
    }
}

fn has(args: &[Value]) -> FuncResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Map(map), Value::String(key)) => Ok(Value::Bool(map.contains_key(key))),
        (Value::List(items), needle) => {
            Ok(Value::Bool(items.iter().any(|item| item.loose_eq(needle))))
        }
        (other, _) => Err(FuncError::expected("has", "map or list", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn sample_map() -> Value {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::Int(2));
        map.insert("a".to_string(), Value::Int(1));
        Value::Map(map)
    }

    #[test]
    fn len_counts_chars_items_and_entries() {
        assert_eq!(len(&["héllo".into()]).unwrap(), Value::Int(5));
        assert_eq!(len(&[Value::List(vec![1.into(), 2.into()])]).unwrap(), Value::Int(2));
        assert_eq!(len(&[sample_map()]).unwrap(), Value::Int(2));
        assert_eq!(len(&[Value::Null]).unwrap(), Value::Int(0));
        assert!(len(&[Value::Int(5)]).is_err());
    }

    #[test]
    fn first_and_last() {
        let list = Value::List(vec![10.into(), 20.into(), 30.into()]);
        assert_eq!(first(&[list.clone()]).unwrap(), Value::Int(10));
        assert_eq!(last(&[list]).unwrap(), Value::Int(30));
        assert_eq!(first(&[Value::List(vec![])]).unwrap(), Value::Null);
        assert_eq!(first(&["abc".into()]).unwrap(), Value::from("a"));
    }

    #[test]
    fn keys_preserve_insertion_order() {
        assert_eq!(
            keys(&[sample_map()]).unwrap(),
            Value::List(vec!["b".into(), "a".into()])
        );
        assert_eq!(
            values(&[sample_map()]).unwrap(),
            Value::List(vec![Value::Int(2), Value::Int(1)])
        );
    }

    #[test]
    fn has_key_and_element() {
        assert_eq!(has(&[sample_map(), "a".into()]).unwrap(), Value::Bool(true));
        assert_eq!(has(&[sample_map(), "z".into()]).unwrap(), Value::Bool(false));
        let list = Value::List(vec![1.into(), 2.into()]);
        assert_eq!(has(&[list, Value::Float(2.0)]).unwrap(), Value::Bool(true));
    }
}
