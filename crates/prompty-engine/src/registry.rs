//! Resolver registry: tag name → handler.

use prompty_ast::Attributes;
use rustc_hash::FxHashMap;

use crate::context::ExecContext;
use crate::error::{ResolveError, ResolveResult};

/// Handler for a named tag.
///
/// Implementations are stateless and shared across executions; the
/// registry requires `Send + Sync` so a populated registry can serve
/// concurrent renders without locking.
pub trait TagResolver: Send + Sync {
    /// The tag name this resolver handles
    fn tag_name(&self) -> &'static str;

    /// Check a tag usage's attributes without resolving it
    fn validate(&self, attrs: &Attributes) -> ResolveResult<()> {
        let _ = attrs;
        Ok(())
    }

    /// Produce the tag's output string
    fn resolve(&self, ctx: &ExecContext<'_>, attrs: &Attributes) -> ResolveResult<String>;
}

/// Registry of tag resolvers.
///
/// Registration is first-come-wins and one-shot; lookups are read-only
/// afterwards.
#[derive(Default)]
pub struct ResolverRegistry {
    map: FxHashMap<&'static str, Box<dyn TagResolver>>,
}

impl ResolverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin resolver set
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Builtin names cannot collide on a fresh registry
        let _ = crate::resolvers::register_all(&mut registry);
        registry
    }

    /// Register a resolver; a second resolver for the same tag is an error
    pub fn register(&mut self, resolver: Box<dyn TagResolver>) -> ResolveResult<()> {
        let name = resolver.tag_name();
        if self.map.contains_key(name) {
            return Err(ResolveError::ResolverAlreadyRegistered { tag: name.to_string() });
        }
        self.map.insert(name, resolver);
        Ok(())
    }

    /// Look up the resolver for a tag name
    pub fn get(&self, name: &str) -> Option<&dyn TagResolver> {
        self.map.get(name).map(|resolver| &**resolver)
    }

    /// Whether a resolver is registered for this tag name
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Registered tag names, sorted for diagnostics
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.map.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
