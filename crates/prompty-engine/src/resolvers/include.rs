//! Sub-template inclusion resolver.

use indexmap::IndexMap;
use prompty_ast::{Attributes, tags};
use prompty_value::Value;

use crate::context::{ExecContext, reserved};
use crate::error::{ResolveError, ResolveResult};
use crate::registry::TagResolver;

/// Attributes with structural meaning; everything else becomes a child
/// variable.
const CONTROL_ATTRS: &[&str] = &["template", "with", "isolate", "onerror", "default"];

/// `{~prompty.include template="…" [with="path"] [isolate="true"] …/~}`
///
/// Child data is the parent scope (optionally narrowed by `with=`, or
/// discarded by `isolate="true"`), plus every non-control attribute as a
/// literal string variable, plus the recorded include depth.
pub struct IncludeResolver;

impl TagResolver for IncludeResolver {
    fn tag_name(&self) -> &'static str {
        tags::INCLUDE
    }

    fn validate(&self, attrs: &Attributes) -> ResolveResult<()> {
        if attrs.get("template").is_none() {
            return Err(ResolveError::MissingTemplateAttr { tag: tags::INCLUDE.to_string() });
        }
        Ok(())
    }

    fn resolve(&self, ctx: &ExecContext<'_>, attrs: &Attributes) -> ResolveResult<String> {
        let Some(template) = attrs.get("template") else {
            return Err(ResolveError::MissingTemplateAttr { tag: tags::INCLUDE.to_string() });
        };
        let Some(engine) = ctx.engine else {
            return Err(ResolveError::EngineNotAvailable);
        };
        if !engine.has_template(template) {
            return Err(ResolveError::TemplateNotFound { name: template.to_string() });
        }
        let max = engine.max_depth();
        let child_depth = ctx.depth + 1;
        if max > 0 && child_depth > max {
            return Err(ResolveError::DepthExceeded { depth: child_depth, max });
        }

        let mut data = child_scope(ctx, attrs);
        for (name, value) in attrs.iter() {
            if !CONTROL_ATTRS.contains(&name) {
                data.insert(name.to_string(), Value::from(value));
            }
        }
        data.insert(reserved::DEPTH.to_string(), Value::Int(child_depth as i64));

        engine
            .execute_template(ctx, template, data)
            .map_err(|err| ResolveError::Other(format!("include {template:?}: {err}")))
    }
}

/// The portion of the parent scope handed to the child
fn child_scope(ctx: &ExecContext<'_>, attrs: &Attributes) -> IndexMap<String, Value> {
    let mut data = IndexMap::new();
    if attrs.get("isolate").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
        return data;
    }
    match attrs.get("with") {
        Some(path) => match ctx.scope.get(path) {
            Some(Value::Map(map)) => data.extend(map),
            Some(other) => {
                data.insert(reserved::VALUE.to_string(), other);
            }
            None => {}
        },
        None => {
            if let Some(keys) = ctx.scope.keys() {
                for key in keys {
                    if let Some(value) = ctx.scope.get(&key) {
                        data.insert(key, value);
                    }
                }
            }
        }
    }
    data
}
