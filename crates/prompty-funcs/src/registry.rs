//! Arity-checked function registry.

use prompty_value::Value;
use rustc_hash::FxHashMap;

use crate::error::{FuncError, FuncResult};

/// Handler signature for registered functions
pub type FuncHandler = fn(&[Value]) -> FuncResult<Value>;

/// Arity bounds for a function; `max` of `None` means variadic
#[derive(Debug, Clone, Copy)]
struct Arity {
    min: usize,
    max: Option<usize>,
}

struct FunctionEntry {
    arity: Arity,
    handler: FuncHandler,
}

/// Registry of named callables for the expression evaluator.
///
/// Populated once at startup (registration is one-shot; duplicates are an
/// error) and read-only afterwards, so a shared reference can serve
/// concurrent template executions.
#[derive(Default)]
pub struct FunctionRegistry {
    funcs: FxHashMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the builtin function set
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Registration of builtins cannot collide; discard the impossible error
        let _ = crate::builtins::register_all(&mut registry);
        registry
    }

    /// Register a function.
    ///
    /// `max_args` of `None` makes the function variadic above `min_args`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        min_args: usize,
        max_args: Option<usize>,
        handler: FuncHandler,
    ) -> FuncResult<()> {
        let name = name.into();
        if self.funcs.contains_key(&name) {
            return Err(FuncError::AlreadyExists { name });
        }
        self.funcs.insert(name, FunctionEntry { arity: Arity { min: min_args, max: max_args }, handler });
        Ok(())
    }

    /// Whether a function is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Registered names, sorted for diagnostics
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Call a function, enforcing its arity bounds
    pub fn call(&self, name: &str, args: &[Value]) -> FuncResult<Value> {
        let Some(entry) = self.funcs.get(name) else {
            return Err(FuncError::NotFound { name: name.to_string() });
        };
        if args.len() < entry.arity.min {
            return Err(FuncError::TooFewArgs {
                name: name.to_string(),
                min: entry.arity.min,
                got: args.len(),
            });
        }
        if let Some(max) = entry.arity.max {
            if args.len() > max {
                return Err(FuncError::TooManyArgs {
                    name: name.to_string(),
                    max,
                    got: args.len(),
                });
            }
        }
        (entry.handler)(args)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn echo_first(args: &[Value]) -> FuncResult<Value> {
        Ok(args.first().cloned().unwrap_or(Value::Null))
    }

    #[test]
    fn register_and_call() {
        let mut registry = FunctionRegistry::new();
        registry.register("echo", 1, Some(1), echo_first).unwrap();
        assert_eq!(registry.call("echo", &[Value::Int(1)]).unwrap(), Value::Int(1));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = FunctionRegistry::new();
        registry.register("echo", 1, Some(1), echo_first).unwrap();
        let err = registry.call("missing", &[]).unwrap_err();
        assert!(matches!(err, FuncError::NotFound { .. }));
        let err = registry.register("echo", 0, None, echo_first).unwrap_err();
        assert_eq!(err, FuncError::AlreadyExists { name: "echo".to_string() });
    }

    #[test]
    fn arity_bounds_are_enforced() {
        let mut registry = FunctionRegistry::new();
        registry.register("echo", 1, Some(2), echo_first).unwrap();
        assert!(matches!(
            registry.call("echo", &[]).unwrap_err(),
            FuncError::TooFewArgs { .. }
        ));
        let args = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        assert!(matches!(
            registry.call("echo", &args).unwrap_err(),
            FuncError::TooManyArgs { .. }
        ));
    }

    #[test]
    fn variadic_accepts_any_count_above_min() {
        let mut registry = FunctionRegistry::new();
        registry.register("echo", 1, None, echo_first).unwrap();
        let args: Vec<Value> = (0..20).map(Value::from).collect();
        assert_eq!(registry.call("echo", &args).unwrap(), Value::Int(0));
    }

    #[test]
    fn builtin_names_are_sorted() {
        let registry = FunctionRegistry::with_builtins();
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(registry.contains("len"));
        assert!(registry.contains("formatDate"));
    }
}
