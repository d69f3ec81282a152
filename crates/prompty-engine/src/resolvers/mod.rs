//! Builtin tag resolvers.

mod catalog;
mod env;
mod include;
mod message;
mod raw;
mod reference;
mod var;

pub use catalog::{SkillsCatalogResolver, ToolsCatalogResolver};
pub use env::EnvResolver;
pub use include::IncludeResolver;
pub use message::MessageResolver;
pub use raw::RawResolver;
pub use reference::RefResolver;
pub use var::VarResolver;

use crate::error::ResolveResult;
use crate::registry::ResolverRegistry;

/// Register every builtin resolver.
///
/// Only fails on a name collision, which cannot happen on a fresh
/// registry.
pub(crate) fn register_all(registry: &mut ResolverRegistry) -> ResolveResult<()> {
    registry.register(Box::new(VarResolver))?;
    registry.register(Box::new(RawResolver))?;
    registry.register(Box::new(IncludeResolver))?;
    registry.register(Box::new(EnvResolver))?;
    registry.register(Box::new(MessageResolver))?;
    registry.register(Box::new(RefResolver))?;
    registry.register(Box::new(SkillsCatalogResolver))?;
    registry.register(Box::new(ToolsCatalogResolver))?;
    Ok(())
}
