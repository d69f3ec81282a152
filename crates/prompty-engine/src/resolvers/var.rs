//! Variable lookup resolver.

use prompty_ast::{Attributes, tags};

use crate::context::ExecContext;
use crate::error::{ResolveError, ResolveResult};
use crate::registry::TagResolver;
use crate::suggest::find_similar;

/// `{~prompty.var name="…" [default="…"] /~}`
pub struct VarResolver;

impl TagResolver for VarResolver {
    fn tag_name(&self) -> &'static str {
        tags::VAR
    }

    fn validate(&self, attrs: &Attributes) -> ResolveResult<()> {
        if attrs.get("name").is_none() {
            return Err(ResolveError::MissingNameAttr { tag: tags::VAR.to_string() });
        }
        Ok(())
    }

    fn resolve(&self, ctx: &ExecContext<'_>, attrs: &Attributes) -> ResolveResult<String> {
        let Some(name) = attrs.get("name") else {
            return Err(ResolveError::MissingNameAttr { tag: tags::VAR.to_string() });
        };
        if let Some(value) = ctx.scope.get(name) {
            return Ok(value.to_string());
        }
        if let Some(default) = attrs.get("default") {
            return Ok(default.to_string());
        }
        Err(ResolveError::VariableNotFound {
            name: name.to_string(),
            available: describe_available(ctx, name),
        })
    }
}

/// Listing limit when no near-match exists
const MAX_LISTED_KEYS: usize = 8;

/// Either a "did you mean" near-match or a truncated key listing
fn describe_available(ctx: &ExecContext<'_>, name: &str) -> String {
    let Some(keys) = ctx.scope.keys() else {
        return String::new();
    };
    if keys.is_empty() {
        return String::new();
    }
    if let Some(similar) = find_similar(name, &keys, ctx.config.suggestion_edit_distance) {
        return format!("; did you mean {similar:?}?");
    }
    let mut sorted = keys;
    sorted.sort_unstable();
    let shown: Vec<&str> = sorted.iter().take(MAX_LISTED_KEYS).map(String::as_str).collect();
    let suffix = if sorted.len() > MAX_LISTED_KEYS { ", ..." } else { "" };
    format!("; available: {}{suffix}", shown.join(", "))
}
