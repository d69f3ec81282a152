//! Role-tagged message resolver.

use std::str::FromStr;

use prompty_ast::{Attributes, tags};

use crate::context::ExecContext;
use crate::error::{ResolveError, ResolveResult};
use crate::message::{Role, start_marker};
use crate::registry::TagResolver;

/// `{~prompty.message role="…" [cache="true"]~}…{~/prompty.message~}`
///
/// Emits the opening sentinel; the executor appends the executed body and
/// the closing sentinel.
pub struct MessageResolver;

impl TagResolver for MessageResolver {
    fn tag_name(&self) -> &'static str {
        tags::MESSAGE
    }

    fn validate(&self, attrs: &Attributes) -> ResolveResult<()> {
        let Some(role) = attrs.get("role") else {
            return Err(ResolveError::MessageMissingRole);
        };
        if Role::from_str(role).is_err() {
            return Err(ResolveError::MessageInvalidRole { role: role.to_string() });
        }
        Ok(())
    }

    fn resolve(&self, _ctx: &ExecContext<'_>, attrs: &Attributes) -> ResolveResult<String> {
        let Some(role_text) = attrs.get("role") else {
            return Err(ResolveError::MessageMissingRole);
        };
        let role = Role::from_str(role_text)
            .map_err(|()| ResolveError::MessageInvalidRole { role: role_text.to_string() })?;
        let cache = attrs.get("cache").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        Ok(start_marker(role, cache))
    }
}
