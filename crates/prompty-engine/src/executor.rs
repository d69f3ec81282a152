//! Template execution: the AST walker.
//!
//! Evaluation order is strictly document order, depth-first and
//! left-to-right. Resolver failures are dispatched through the
//! error-strategy table at exactly one site ([`substitute_failure`]);
//! executor invariants (nesting depth) throw unconditionally.

use prompty_ast::{Attributes, Node, NodeKind, SwitchCase, tags};
use prompty_position::Position;
use prompty_value::Value;

use crate::context::{ExecContext, ScopedContext};
use crate::error::{EngineError, ResolveError};
use crate::hints::hint_for;
use crate::message::MSG_END;
use crate::strategy::ErrorStrategy;

/// Execute a template tree to its flat output string
pub fn execute(root: &Node, ctx: &ExecContext<'_>) -> Result<String, EngineError> {
    let mut out = String::new();
    exec_node(root, ctx, 0, &mut out)?;
    Ok(out)
}

fn exec_nodes(
    nodes: &[Node],
    ctx: &ExecContext<'_>,
    depth: usize,
    out: &mut String,
) -> Result<(), EngineError> {
    for node in nodes {
        exec_node(node, ctx, depth, out)?;
    }
    Ok(())
}

fn exec_node(
    node: &Node,
    ctx: &ExecContext<'_>,
    depth: usize,
    out: &mut String,
) -> Result<(), EngineError> {
    match &node.kind {
        NodeKind::Root { children } => exec_nodes(children, ctx, depth, out),
        NodeKind::Text { content } => {
            out.push_str(content);
            Ok(())
        }
        NodeKind::Tag { .. } => exec_tag(node, ctx, depth, out),
        NodeKind::Block { children, .. } => {
            let child_depth = enter_children(ctx, depth, node.pos)?;
            exec_nodes(children, ctx, child_depth, out)
        }
        NodeKind::Conditional { branches } => {
            for branch in branches {
                if branch.is_else {
                    return exec_nodes(&branch.children, ctx, depth, out);
                }
                match prompty_expr::evaluate_bool(&branch.condition, ctx.scope, ctx.funcs) {
                    Ok(true) => return exec_nodes(&branch.children, ctx, depth, out),
                    Ok(false) => {}
                    Err(err) => {
                        return expr_failure(ctx, &branch.condition, branch.pos, err);
                    }
                }
            }
            Ok(())
        }
        NodeKind::For { item_var, index_var, source_path, limit, children } => {
            exec_for(node.pos, item_var, index_var.as_deref(), source_path, *limit, children, ctx, depth, out)
        }
        NodeKind::Switch { expression, cases } => {
            exec_switch(node.pos, expression, cases, ctx, depth, out)
        }
    }
}

/// Depth guard for descending into a block tag's children
fn enter_children(
    ctx: &ExecContext<'_>,
    depth: usize,
    pos: Position,
) -> Result<usize, EngineError> {
    let child_depth = depth + 1;
    let max = ctx.config.max_nesting_depth;
    if max > 0 && child_depth > max {
        return Err(EngineError::MaxDepthExceeded { depth: child_depth, max, position: pos });
    }
    Ok(child_depth)
}

fn exec_tag(
    node: &Node,
    ctx: &ExecContext<'_>,
    depth: usize,
    out: &mut String,
) -> Result<(), EngineError> {
    let NodeKind::Tag { name, attrs, children, self_close, raw_content, raw_source } = &node.kind
    else {
        return Ok(());
    };

    // Raw blocks never resolve; their body was preserved by the parser
    if name == tags::RAW {
        if let Some(content) = raw_content {
            out.push_str(content);
        }
        return Ok(());
    }

    let child_depth =
        if *self_close { depth } else { enter_children(ctx, depth, node.pos)? };

    if ctx.cancel.is_cancelled() {
        return substitute_failure(
            ctx,
            name,
            attrs,
            raw_source,
            node.pos,
            ResolveError::Cancelled,
            out,
        );
    }

    let Some(resolver) = ctx.resolvers.get(name) else {
        let strategy = strategy_for(ctx, attrs);
        if strategy == ErrorStrategy::Throw {
            return Err(EngineError::UnknownTag { name: name.clone(), position: node.pos });
        }
        return substitute_failure(
            ctx,
            name,
            attrs,
            raw_source,
            node.pos,
            ResolveError::Other(format!("unknown tag {name:?}")),
            out,
        );
    };

    match resolver.resolve(ctx, attrs) {
        Ok(output) => {
            out.push_str(&output);
            if name == tags::MESSAGE {
                // Message bodies are sanitized of stray NUL bytes so the
                // marker stream stays parseable; a self-closing message
                // still gets a terminated, empty-body marker pair
                let mut body = String::new();
                if !*self_close {
                    exec_nodes(children, ctx, child_depth, &mut body)?;
                }
                if body.contains('\u{0}') {
                    body = body.replace('\u{0}', "");
                }
                out.push_str(&body);
                out.push_str(MSG_END);
            } else if !*self_close {
                exec_nodes(children, ctx, child_depth, out)?;
            }
            Ok(())
        }
        Err(err) => substitute_failure(ctx, name, attrs, raw_source, node.pos, err, out),
    }
}

#[allow(clippy::too_many_arguments)]
fn exec_for(
    pos: Position,
    item_var: &str,
    index_var: Option<&str>,
    source_path: &str,
    limit: usize,
    children: &[Node],
    ctx: &ExecContext<'_>,
    depth: usize,
    out: &mut String,
) -> Result<(), EngineError> {
    let items: Vec<Value> = match ctx.scope.get(source_path) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::List(items)) => items,
        Some(Value::Map(map)) => map.into_values().collect(),
        Some(other) => {
            let err = ResolveError::InvalidContext {
                reason: format!(
                    "for-loop source {source_path:?} is {}, not a list or map",
                    other.type_name()
                ),
            };
            return control_failure(ctx, tags::FOR, pos, err);
        }
    };

    for (index, item) in items.into_iter().enumerate() {
        if limit > 0 && index >= limit {
            break;
        }
        let mut scope = ScopedContext::new(ctx.scope);
        scope.bind(item_var, item);
        if let Some(index_var) = index_var {
            scope.bind(index_var, index);
        }
        let child_ctx = ctx.with_scope(&scope);
        exec_nodes(children, &child_ctx, depth, out)?;
    }
    Ok(())
}

fn exec_switch(
    pos: Position,
    expression: &str,
    cases: &[SwitchCase],
    ctx: &ExecContext<'_>,
    depth: usize,
    out: &mut String,
) -> Result<(), EngineError> {
    let value = match prompty_expr::evaluate(expression, ctx.scope, ctx.funcs) {
        Ok(value) => value,
        Err(err) => return expr_failure(ctx, expression, pos, err),
    };
    let stringified = value.to_string();

    for case in cases {
        if case.is_default {
            continue;
        }
        let matched = if let Some(expected) = &case.value {
            *expected == stringified
        } else if let Some(eval) = &case.eval {
            match prompty_expr::evaluate_bool(eval, ctx.scope, ctx.funcs) {
                Ok(result) => result,
                Err(err) => return expr_failure(ctx, eval, case.pos, err),
            }
        } else {
            false
        };
        if matched {
            return exec_nodes(&case.children, ctx, depth, out);
        }
    }
    if let Some(default) = cases.iter().find(|c| c.is_default) {
        return exec_nodes(&default.children, ctx, depth, out);
    }
    Ok(())
}

/// The strategy in effect for a tag: its own `onerror` (unknown names fall
/// through to throw), else the context default, else throw
fn strategy_for(ctx: &ExecContext<'_>, attrs: &Attributes) -> ErrorStrategy {
    if let Some(name) = attrs.get("onerror") {
        return ErrorStrategy::from_name(name).unwrap_or(ErrorStrategy::Throw);
    }
    ctx.default_strategy.unwrap_or(ctx.config.default_error_strategy)
}

/// Dispatch a failing tag through the error-strategy table
fn substitute_failure(
    ctx: &ExecContext<'_>,
    tag: &str,
    attrs: &Attributes,
    raw_source: &str,
    pos: Position,
    err: ResolveError,
    out: &mut String,
) -> Result<(), EngineError> {
    match strategy_for(ctx, attrs) {
        ErrorStrategy::Throw => {
            let hint = if attrs.contains("default") || attrs.contains("onerror") {
                None
            } else {
                hint_for(&err)
            };
            Err(EngineError::ResolverFailed {
                tag: tag.to_string(),
                position: pos,
                source: err,
                hint,
            })
        }
        ErrorStrategy::Default => {
            out.push_str(attrs.get("default").unwrap_or_default());
            Ok(())
        }
        ErrorStrategy::Remove => Ok(()),
        ErrorStrategy::KeepRaw => {
            out.push_str(raw_source);
            Ok(())
        }
        ErrorStrategy::Log => {
            tracing::warn!(tag, line = pos.line, column = pos.column, error = %err, "tag failed");
            Ok(())
        }
    }
}

/// Strategy dispatch for a failing `eval=` expression in a control tag.
///
/// Control nodes carry no attributes, so only the context default applies;
/// with no preserved source, keepraw degrades to an empty substitution.
fn expr_failure(
    ctx: &ExecContext<'_>,
    expression: &str,
    pos: Position,
    err: prompty_expr::ExprError,
) -> Result<(), EngineError> {
    match ctx.default_strategy.unwrap_or(ctx.config.default_error_strategy) {
        ErrorStrategy::Throw => Err(EngineError::ExprFailed {
            expression: expression.to_string(),
            position: pos,
            source: err,
        }),
        ErrorStrategy::Log => {
            tracing::warn!(expression, line = pos.line, column = pos.column, error = %err, "expression failed");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Strategy dispatch for a control tag failing on a non-expression error
fn control_failure(
    ctx: &ExecContext<'_>,
    tag: &str,
    pos: Position,
    err: ResolveError,
) -> Result<(), EngineError> {
    match ctx.default_strategy.unwrap_or(ctx.config.default_error_strategy) {
        ErrorStrategy::Throw => Err(EngineError::ResolverFailed {
            tag: tag.to_string(),
            position: pos,
            source: err,
            hint: None,
        }),
        ErrorStrategy::Log => {
            tracing::warn!(tag, line = pos.line, column = pos.column, error = %err, "tag failed");
            Ok(())
        }
        _ => Ok(()),
    }
}
