//! Expression evaluation.

use prompty_funcs::FunctionRegistry;
use prompty_value::{ContextReader, Value};

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ExprError, ExprResult};
use crate::parser::parse;

/// Parse and evaluate an expression string against a context.
///
/// Identifier misses resolve to nil rather than failing; `&&` and `||`
/// short-circuit and yield booleans.
pub fn evaluate(
    source: &str,
    ctx: &dyn ContextReader,
    funcs: &FunctionRegistry,
) -> ExprResult<Value> {
    let expr = parse(source)?;
    eval_expr(&expr, ctx, funcs)
}

/// Evaluate an expression string to its truthiness
pub fn evaluate_bool(
    source: &str,
    ctx: &dyn ContextReader,
    funcs: &FunctionRegistry,
) -> ExprResult<bool> {
    evaluate(source, ctx, funcs).map(|v| v.is_truthy())
}

/// Evaluate a parsed expression tree
pub fn eval_expr(
    expr: &Expr,
    ctx: &dyn ContextReader,
    funcs: &FunctionRegistry,
) -> ExprResult<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Identifier(name) => Ok(ctx.get(name).unwrap_or(Value::Null)),
        Expr::Unary { op: UnaryOp::Not, right } => {
            let value = eval_expr(right, ctx, funcs)?;
            Ok(Value::Bool(!value.is_truthy()))
        }
        Expr::Binary { op, left, right } => eval_binary(*op, left, right, ctx, funcs),
        Expr::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(arg, ctx, funcs)?);
            }
            Ok(funcs.call(name, &values)?)
        }
    }
}

fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    ctx: &dyn ContextReader,
    funcs: &FunctionRegistry,
) -> ExprResult<Value> {
    match op {
        BinaryOp::And => {
            if !eval_expr(left, ctx, funcs)?.is_truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(eval_expr(right, ctx, funcs)?.is_truthy()))
        }
        BinaryOp::Or => {
            if eval_expr(left, ctx, funcs)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(eval_expr(right, ctx, funcs)?.is_truthy()))
        }
        BinaryOp::Eq | BinaryOp::Neq => {
            let lhs = eval_expr(left, ctx, funcs)?;
            let rhs = eval_expr(right, ctx, funcs)?;
            let equal = lhs.loose_eq(&rhs);
            Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte => {
            let lhs = eval_expr(left, ctx, funcs)?;
            let rhs = eval_expr(right, ctx, funcs)?;
            let Some(ordering) = lhs.partial_compare(&rhs) else {
                return Err(ExprError::TypeMismatch {
                    left: lhs.type_name(),
                    right: rhs.type_name(),
                });
            };
            let result = match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Gt => ordering.is_gt(),
                BinaryOp::Lte => ordering.is_le(),
                BinaryOp::Gte => ordering.is_ge(),
                _ => unreachable!("handled above"),
            };
            Ok(Value::Bool(result))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use prompty_funcs::FuncError;
    use prompty_value::MapContext;
    use pretty_assertions::assert_eq;

    fn ctx() -> MapContext {
        let mut ctx = MapContext::new();
        ctx.insert("n", 7);
        ctx.insert("name", "Alice");
        ctx.insert("flag", true);
        ctx.insert("items", Value::List(vec![1.into(), 2.into()]));
        ctx
    }

    fn eval(source: &str) -> Value {
        evaluate(source, &ctx(), &FunctionRegistry::with_builtins()).unwrap()
    }

    fn eval_err(source: &str) -> ExprError {
        evaluate(source, &ctx(), &FunctionRegistry::with_builtins()).unwrap_err()
    }

    #[test]
    fn literals() {
        assert_eq!(eval("42"), Value::Int(42));
        assert_eq!(eval("2.5"), Value::Float(2.5));
        assert_eq!(eval("\"hi\""), Value::from("hi"));
        assert_eq!(eval("true"), Value::Bool(true));
        assert_eq!(eval("nil"), Value::Null);
    }

    #[test]
    fn identifier_miss_is_nil() {
        assert_eq!(eval("missing"), Value::Null);
        assert_eq!(eval("missing == nil"), Value::Bool(true));
    }

    #[test]
    fn comparisons() {
        assert_eq!(eval("n > 5"), Value::Bool(true));
        assert_eq!(eval("n > 10"), Value::Bool(false));
        assert_eq!(eval("n >= 7"), Value::Bool(true));
        assert_eq!(eval("n <= 6"), Value::Bool(false));
        assert_eq!(eval("name == \"Alice\""), Value::Bool(true));
        assert_eq!(eval("name != \"Bob\""), Value::Bool(true));
        assert_eq!(eval("n == 7.0"), Value::Bool(true));
    }

    #[test]
    fn mixed_type_ordering_fails() {
        assert!(matches!(eval_err("n > \"5\""), ExprError::TypeMismatch { .. }));
    }

    #[test]
    fn nil_comparisons() {
        assert_eq!(eval("nil == nil"), Value::Bool(true));
        assert_eq!(eval("nil == 0"), Value::Bool(false));
        assert_eq!(eval("nil == \"\""), Value::Bool(false));
    }

    #[test]
    fn logical_operators() {
        assert_eq!(eval("flag && n > 5"), Value::Bool(true));
        assert_eq!(eval("!flag || n > 5"), Value::Bool(true));
        assert_eq!(eval("!flag"), Value::Bool(false));
        assert_eq!(eval("!missing"), Value::Bool(true));
    }

    #[test]
    fn short_circuit_skips_right_side() {
        // unknown() would fail if evaluated
        assert_eq!(eval("false && unknown()"), Value::Bool(false));
        assert_eq!(eval("true || unknown()"), Value::Bool(true));
        assert!(matches!(
            eval_err("true && unknown()"),
            ExprError::Func(FuncError::NotFound { .. })
        ));
    }

    #[test]
    fn function_calls() {
        assert_eq!(eval("upper(name)"), Value::from("ALICE"));
        assert_eq!(eval("len(items)"), Value::Int(2));
        assert_eq!(eval("contains(name, \"lic\")"), Value::Bool(true));
        assert_eq!(eval("len(name) > 3"), Value::Bool(true));
    }

    #[test]
    fn nested_calls() {
        assert_eq!(eval("upper(trim(\"  x  \"))"), Value::from("X"));
        assert_eq!(eval("default(missing, \"fb\")"), Value::from("fb"));
        assert_eq!(eval("coalesce(missing, nil, name)"), Value::from("Alice"));
    }

    #[test]
    fn truthiness_of_collections() {
        assert_eq!(evaluate_bool("items", &ctx(), &FunctionRegistry::with_builtins()).unwrap(), true);
        assert_eq!(
            evaluate_bool("\"\"", &ctx(), &FunctionRegistry::with_builtins()).unwrap(),
            false
        );
    }

    #[test]
    fn arity_errors_surface() {
        assert!(matches!(
            eval_err("upper()"),
            ExprError::Func(FuncError::TooFewArgs { .. })
        ));
        assert!(matches!(
            eval_err("upper(\"a\", \"b\")"),
            ExprError::Func(FuncError::TooManyArgs { .. })
        ));
    }
}
