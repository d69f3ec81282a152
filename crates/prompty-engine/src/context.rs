//! Execution context and collaborator interfaces.

use indexmap::IndexMap;
use prompty_funcs::FunctionRegistry;
use prompty_value::{ContextReader, Value};

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::{EngineError, ResolveResult};
use crate::registry::ResolverRegistry;
use crate::strategy::ErrorStrategy;

/// Reserved context keys.
pub mod reserved {
    /// Include depth recorded in child template data
    pub const DEPTH: &str = "_prompty_depth";
    /// Key a non-mapping `with=` value is injected under
    pub const VALUE: &str = "value";
    /// Pre-computed skills catalog text
    pub const SKILLS_CATALOG: &str = "_prompty_skills_catalog";
    /// Pre-computed tools catalog text
    pub const TOOLS_CATALOG: &str = "_prompty_tools_catalog";
}

/// Engine handle the include resolver calls back into.
pub trait TemplateExecutor: Send + Sync {
    /// Execute a stored template with fresh child data
    fn execute_template(
        &self,
        ctx: &ExecContext<'_>,
        name: &str,
        data: IndexMap<String, Value>,
    ) -> Result<String, EngineError>;

    /// Whether a template is stored under this name
    fn has_template(&self, name: &str) -> bool;

    /// Maximum include recursion depth (0 disables the limit)
    fn max_depth(&self) -> usize;

    /// Raw source of a stored template
    fn template_source(&self, name: &str) -> Option<String>;
}

/// External document store behind the ref resolver.
pub trait DocumentResolver: Send + Sync {
    /// Resolve a prompt body by slug and optional version
    fn resolve_prompt_body(
        &self,
        cancel: &CancelToken,
        slug: &str,
        version: Option<&str>,
    ) -> ResolveResult<String>;
}

/// Per-execution state threaded through the executor and resolvers.
///
/// Everything is borrowed; deriving a child context for a nested scope or
/// a deeper reference chain is a field-for-field copy.
#[derive(Clone, Copy)]
pub struct ExecContext<'a> {
    /// Current variable scope
    pub scope: &'a dyn ContextReader,
    /// Function registry for expression calls
    pub funcs: &'a FunctionRegistry,
    /// Resolver registry for tag dispatch
    pub resolvers: &'a ResolverRegistry,
    /// Engine configuration
    pub config: &'a EngineConfig,
    /// Engine handle for includes, when rendering through an engine
    pub engine: Option<&'a dyn TemplateExecutor>,
    /// Document store for refs, when wired in
    pub doc_resolver: Option<&'a dyn DocumentResolver>,
    /// Current include depth
    pub depth: usize,
    /// Current reference-chain depth
    pub ref_depth: usize,
    /// Slugs on the active reference chain, outermost first
    pub ref_chain: &'a [String],
    /// Context-level fallback error strategy
    pub default_strategy: Option<ErrorStrategy>,
    /// Cancellation handle
    pub cancel: &'a CancelToken,
}

impl<'a> ExecContext<'a> {
    /// Create a context with no engine, document resolver, or chain state
    pub fn new(
        scope: &'a dyn ContextReader,
        funcs: &'a FunctionRegistry,
        resolvers: &'a ResolverRegistry,
        config: &'a EngineConfig,
        cancel: &'a CancelToken,
    ) -> Self {
        ExecContext {
            scope,
            funcs,
            resolvers,
            config,
            engine: None,
            doc_resolver: None,
            depth: 0,
            ref_depth: 0,
            ref_chain: &[],
            default_strategy: None,
            cancel,
        }
    }

    /// The same context with a different variable scope
    pub fn with_scope<'b>(&self, scope: &'b dyn ContextReader) -> ExecContext<'b>
    where
        'a: 'b,
    {
        ExecContext {
            scope,
            funcs: self.funcs,
            resolvers: self.resolvers,
            config: self.config,
            engine: self.engine,
            doc_resolver: self.doc_resolver,
            depth: self.depth,
            ref_depth: self.ref_depth,
            ref_chain: self.ref_chain,
            default_strategy: self.default_strategy,
            cancel: self.cancel,
        }
    }

    /// The same context with the reference chain extended by one link
    pub fn with_ref_chain<'b>(&self, ref_depth: usize, ref_chain: &'b [String]) -> ExecContext<'b>
    where
        'a: 'b,
    {
        ExecContext {
            scope: self.scope,
            funcs: self.funcs,
            resolvers: self.resolvers,
            config: self.config,
            engine: self.engine,
            doc_resolver: self.doc_resolver,
            depth: self.depth,
            ref_depth,
            ref_chain,
            default_strategy: self.default_strategy,
            cancel: self.cancel,
        }
    }
}

/// A scope layered over a base context, used for loop bindings.
///
/// Lookups check the layer first (including dotted paths rooted at a bound
/// name), then fall through to the base.
pub struct ScopedContext<'a> {
    base: &'a dyn ContextReader,
    vars: IndexMap<String, Value>,
}

impl<'a> ScopedContext<'a> {
    /// Create an empty layer over a base scope
    pub fn new(base: &'a dyn ContextReader) -> Self {
        ScopedContext { base, vars: IndexMap::new() }
    }

    /// Bind a name in this layer
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl ContextReader for ScopedContext<'_> {
    fn get(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if let Some(value) = self.vars.get(head) {
            return match rest {
                None => Some(value.clone()),
                Some(rest) => value.lookup_path(rest).cloned(),
            };
        }
        self.base.get(path)
    }

    fn keys(&self) -> Option<Vec<String>> {
        let mut keys: Vec<String> = self.vars.keys().cloned().collect();
        if let Some(base_keys) = self.base.keys() {
            keys.extend(base_keys);
        }
        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use prompty_value::MapContext;
    use pretty_assertions::assert_eq;

    #[test]
    fn layer_shadows_base() {
        let mut base = MapContext::new();
        base.insert("x", 1);
        base.insert("y", 2);
        let mut layer = ScopedContext::new(&base);
        layer.bind("x", 10);

        assert_eq!(layer.get("x"), Some(Value::Int(10)));
        assert_eq!(layer.get("y"), Some(Value::Int(2)));
    }

    #[test]
    fn dotted_paths_resolve_through_bindings() {
        let base = MapContext::new();
        let mut inner = IndexMap::new();
        inner.insert("name".to_string(), Value::from("Ada"));
        let mut layer = ScopedContext::new(&base);
        layer.bind("item", Value::Map(inner));

        assert_eq!(layer.get("item.name"), Some(Value::from("Ada")));
        assert_eq!(layer.get("item.other"), None);
    }
}
