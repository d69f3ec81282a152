//! String manipulation builtins.

use prompty_value::Value;

use crate::error::{FuncError, FuncResult};
use crate::registry::FunctionRegistry;

pub(crate) fn register(registry: &mut FunctionRegistry) -> FuncResult<()> {
    registry.register("upper", 1, Some(1), upper)?;
    registry.register("lower", 1, Some(1), lower)?;
    registry.register("trim", 1, Some(1), trim)?;
    registry.register("trimPrefix", 2, Some(2), trim_prefix)?;
    registry.register("trimSuffix", 2, Some(2), trim_suffix)?;
    registry.register("contains", 2, Some(2), contains)?;
    registry.register("hasPrefix", 2, Some(2), has_prefix)?;
    registry.register("hasSuffix", 2, Some(2), has_suffix)?;
    registry.register("split", 2, Some(2), split)?;
    registry.register("join", 2, Some(2), join)?;
    registry.register("replace", 3, Some(3), replace)?;
    Ok(())
}

fn str_arg<'a>(name: &str, args: &'a [Value], index: usize) -> FuncResult<&'a str> {
    match &args[index] {
        Value::String(s) => Ok(s),
        other => Err(FuncError::expected(name, "string", other.type_name())),
    }
}

fn upper(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::from(str_arg("upper", args, 0)?.to_uppercase()))
}

fn lower(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::from(str_arg("lower", args, 0)?.to_lowercase()))
}

fn trim(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::from(str_arg("trim", args, 0)?.trim()))
}

fn trim_prefix(args: &[Value]) -> FuncResult<Value> {
    let s = str_arg("trimPrefix", args, 0)?;
    let prefix = str_arg("trimPrefix", args, 1)?;
    Ok(Value::from(s.strip_prefix(prefix).unwrap_or(s)))
}

fn trim_suffix(args: &[Value]) -> FuncResult<Value> {
    let s = str_arg("trimSuffix", args, 0)?;
    let suffix = str_arg("trimSuffix", args, 1)?;
    Ok(Value::from(s.strip_suffix(suffix).unwrap_or(s)))
}

fn contains(args: &[Value]) -> FuncResult<Value> {
    let s = str_arg("contains", args, 0)?;
    let needle = str_arg("contains", args, 1)?;
    Ok(Value::Bool(s.contains(needle)))
}

fn has_prefix(args: &[Value]) -> FuncResult<Value> {
    let s = str_arg("hasPrefix", args, 0)?;
    let prefix = str_arg("hasPrefix", args, 1)?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

fn has_suffix(args: &[Value]) -> FuncResult<Value> {
    let s = str_arg("hasSuffix", args, 0)?;
    let suffix = str_arg("hasSuffix", args, 1)?;
    Ok(Value::Bool(s.ends_with(suffix)))
}

fn split(args: &[Value]) -> FuncResult<Value> {
    let s = str_arg("split", args, 0)?;
    let separator = str_arg("split", args, 1)?;
    let parts: Vec<Value> = if separator.is_empty() {
        s.chars().map(|c| Value::from(c.to_string())).collect()
    } else {
        s.split(separator).map(Value::from).collect()
    };
    Ok(Value::List(parts))
}

fn join(args: &[Value]) -> FuncResult<Value> {
    let items = match &args[0] {
        Value::List(items) => items,
        other => return Err(FuncError::expected("join", "list", other.type_name())),
    };
    let separator = str_arg("join", args, 1)?;
    let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
    Ok(Value::from(joined.join(separator)))
}

fn replace(args: &[Value]) -> FuncResult<Value> {
    let s = str_arg("replace", args, 0)?;
    let from = str_arg("replace", args, 1)?;
    let to = str_arg("replace", args, 2)?;
    Ok(Value::from(s.replace(from, to)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn call(f: fn(&[Value]) -> FuncResult<Value>, args: &[Value]) -> Value {
        f(args).unwrap()
    }

    #[test]
    fn case_functions() {
        assert_eq!(call(upper, &["abc".into()]), Value::from("ABC"));
        assert_eq!(call(lower, &["AbC".into()]), Value::from("abc"));
    }

    #[test]
    fn trims() {
        assert_eq!(call(trim, &["  x  ".into()]), Value::from("x"));
        assert_eq!(call(trim_prefix, &["prefix.rest".into(), "prefix.".into()]), Value::from("rest"));
        assert_eq!(call(trim_suffix, &["file.txt".into(), ".txt".into()]), Value::from("file"));
        assert_eq!(call(trim_prefix, &["abc".into(), "zz".into()]), Value::from("abc"));
    }

    #[test]
    fn searching() {
        assert_eq!(call(contains, &["haystack".into(), "stack".into()]), Value::Bool(true));
        assert_eq!(call(has_prefix, &["haystack".into(), "hay".into()]), Value::Bool(true));
        assert_eq!(call(has_suffix, &["haystack".into(), "hay".into()]), Value::Bool(false));
    }

    #[test]
    fn split_and_join() {
        let parts = call(split, &["a,b,c".into(), ",".into()]);
        assert_eq!(parts, Value::List(vec!["a".into(), "b".into(), "c".into()]));
        assert_eq!(call(join, &[parts, "-".into()]), Value::from("a-b-c"));
    }

    #[test]
    fn split_empty_separator_yields_chars() {
        assert_eq!(
            call(split, &["abc".into(), "".into()]),
            Value::List(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn replace_all_occurrences() {
        assert_eq!(call(replace, &["a-b-c".into(), "-".into(), "+".into()]), Value::from("a+b+c"));
    }

    #[test]
    fn non_string_is_rejected() {
        let err = upper(&[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, FuncError::ExpectedString { .. }));
    }
}
