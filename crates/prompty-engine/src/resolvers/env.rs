//! Process environment resolver.

use prompty_ast::{Attributes, tags};

use crate::context::ExecContext;
use crate::error::{ResolveError, ResolveResult};
use crate::registry::TagResolver;

/// `{~prompty.env name="…" [default="…"] [required="true"] /~}`
pub struct EnvResolver;

impl TagResolver for EnvResolver {
    fn tag_name(&self) -> &'static str {
        tags::ENV
    }

    fn validate(&self, attrs: &Attributes) -> ResolveResult<()> {
        if attrs.get("name").is_none() {
            return Err(ResolveError::MissingNameAttr { tag: tags::ENV.to_string() });
        }
        Ok(())
    }

    fn resolve(&self, _ctx: &ExecContext<'_>, attrs: &Attributes) -> ResolveResult<String> {
        let Some(name) = attrs.get("name") else {
            return Err(ResolveError::MissingNameAttr { tag: tags::ENV.to_string() });
        };
        let value = std::env::var(name).unwrap_or_default();
        if !value.is_empty() {
            return Ok(value);
        }
        if let Some(default) = attrs.get("default") {
            return Ok(default.to_string());
        }
        if attrs.get("required").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            return Err(ResolveError::EnvVarRequired { name: name.to_string() });
        }
        Ok(String::new())
    }
}
