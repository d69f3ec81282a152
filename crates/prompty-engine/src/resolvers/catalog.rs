//! Catalog resolvers.
//!
//! Hosts pre-compute skills and tools catalog text and place it under
//! reserved context keys; these resolvers just read it back. An absent
//! catalog renders as the empty string.

use prompty_ast::{Attributes, tags};

use crate::context::{ExecContext, reserved};
use crate::error::ResolveResult;
use crate::registry::TagResolver;

/// `{~prompty.skills_catalog /~}`
pub struct SkillsCatalogResolver;

impl TagResolver for SkillsCatalogResolver {
    fn tag_name(&self) -> &'static str {
        tags::SKILLS_CATALOG
    }

    fn resolve(&self, ctx: &ExecContext<'_>, _attrs: &Attributes) -> ResolveResult<String> {
        Ok(ctx.scope.get_string(reserved::SKILLS_CATALOG))
    }
}

/// `{~prompty.tools_catalog /~}`
pub struct ToolsCatalogResolver;

impl TagResolver for ToolsCatalogResolver {
    fn tag_name(&self) -> &'static str {
        tags::TOOLS_CATALOG
    }

    fn resolve(&self, ctx: &ExecContext<'_>, _attrs: &Attributes) -> ResolveResult<String> {
        Ok(ctx.scope.get_string(reserved::TOOLS_CATALOG))
    }
}
