//! Raw block resolver stub.
//!
//! Raw blocks are handled entirely by the parser; their preserved content
//! is emitted by the executor without resolution. The resolver exists so
//! the tag name is registered, and reports a programming error if it is
//! ever invoked.

use prompty_ast::{Attributes, tags};

use crate::context::ExecContext;
use crate::error::{ResolveError, ResolveResult};
use crate::registry::TagResolver;

/// `{~prompty.raw~}…{~/prompty.raw~}`
pub struct RawResolver;

impl TagResolver for RawResolver {
    fn tag_name(&self) -> &'static str {
        tags::RAW
    }

    fn resolve(&self, _ctx: &ExecContext<'_>, _attrs: &Attributes) -> ResolveResult<String> {
        Err(ResolveError::RawResolverCalled)
    }
}
