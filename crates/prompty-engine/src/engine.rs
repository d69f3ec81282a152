//! The engine front door.
//!
//! An [`Engine`] owns the function and resolver registries (built once at
//! construction), a named template store, and the optional document
//! resolver. It drives the full pipeline: frontmatter strip → parse →
//! inheritance merge → execute → (optionally) message extraction. The
//! include resolver calls back into the engine through
//! [`TemplateExecutor`].

use indexmap::IndexMap;
use prompty_ast::{Node, NodeKind};
use prompty_funcs::FunctionRegistry;
use prompty_parser::{FrontmatterResult, Parser, extract_frontmatter};
use prompty_value::{ContextReader, MapContext, Value};
use rustc_hash::FxHashMap;

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::context::{DocumentResolver, ExecContext, TemplateExecutor, reserved};
use crate::error::EngineError;
use crate::executor::execute;
use crate::inheritance::{SourceResolver, resolve_inheritance};
use crate::message::{MessageInfo, extract_messages};
use crate::registry::ResolverRegistry;

/// A parsed template ready for repeated execution.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    /// Frontmatter extraction result; the YAML text is kept unparsed
    pub frontmatter: FrontmatterResult,
    /// Merged template tree
    pub root: Node,
}

/// Template engine owning registries, templates, and configuration.
///
/// Registries are populated at construction and read-only afterwards, so a
/// shared `&Engine` can serve concurrent renders.
pub struct Engine {
    config: EngineConfig,
    funcs: FunctionRegistry,
    resolvers: ResolverRegistry,
    templates: FxHashMap<String, String>,
    doc_resolver: Option<Box<dyn DocumentResolver>>,
}

impl Engine {
    /// Create an engine with the builtin registries and a configuration
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            config,
            funcs: FunctionRegistry::with_builtins(),
            resolvers: ResolverRegistry::with_builtins(),
            templates: FxHashMap::default(),
            doc_resolver: None,
        }
    }

    /// Create an engine with the default configuration
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Store a named template for includes and inheritance
    pub fn add_template(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }

    /// Wire in the document store backing `prompty.ref`
    pub fn set_document_resolver(&mut self, resolver: Box<dyn DocumentResolver>) {
        self.doc_resolver = Some(resolver);
    }

    /// Mutable access to the function registry, for host registrations
    /// before first use
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.funcs
    }

    /// Mutable access to the resolver registry, for host registrations
    /// before first use
    pub fn resolvers_mut(&mut self) -> &mut ResolverRegistry {
        &mut self.resolvers
    }

    /// Compile a source: frontmatter strip, parse, inheritance merge, and
    /// attribute validation of every registered tag
    pub fn compile(&self, source: &str) -> Result<CompiledTemplate, EngineError> {
        let compiled = self.compile_unchecked(source)?;
        self.validate_tags(&compiled.root)?;
        Ok(compiled)
    }

    fn compile_unchecked(&self, source: &str) -> Result<CompiledTemplate, EngineError> {
        let frontmatter = extract_frontmatter(source)?;
        let root = Parser::with_config(&frontmatter.template_body, self.config.lexer_config())
            .parse()?;
        let root = resolve_inheritance(root, self, &self.config)?;
        Ok(CompiledTemplate { frontmatter, root })
    }

    /// Render a template source to its flat output string
    pub fn render(&self, source: &str, data: &MapContext) -> Result<String, EngineError> {
        self.render_with_cancel(source, data, &CancelToken::new())
    }

    /// Render with an explicit cancellation token
    pub fn render_with_cancel(
        &self,
        source: &str,
        data: &MapContext,
        cancel: &CancelToken,
    ) -> Result<String, EngineError> {
        let _span = tracing::debug_span!("render", bytes = source.len()).entered();
        let compiled = self.compile_unchecked(source)?;
        self.execute_root(&compiled.root, data, 0, cancel)
    }

    /// Render a stored template by name
    pub fn render_template(&self, name: &str, data: &MapContext) -> Result<String, EngineError> {
        let Some(source) = self.templates.get(name) else {
            return Err(EngineError::TemplateNotFound { name: name.to_string() });
        };
        let source = source.clone();
        self.render(&source, data)
    }

    /// Execute an already-compiled template
    pub fn execute_compiled(
        &self,
        compiled: &CompiledTemplate,
        data: &MapContext,
    ) -> Result<String, EngineError> {
        self.execute_root(&compiled.root, data, 0, &CancelToken::new())
    }

    /// Render a source and extract its role-tagged messages
    pub fn render_messages(
        &self,
        source: &str,
        data: &MapContext,
    ) -> Result<Vec<MessageInfo>, EngineError> {
        let output = self.render(source, data)?;
        Ok(extract_messages(&output))
    }

    fn execute_root(
        &self,
        root: &Node,
        scope: &dyn ContextReader,
        depth: usize,
        cancel: &CancelToken,
    ) -> Result<String, EngineError> {
        let ctx = ExecContext {
            scope,
            funcs: &self.funcs,
            resolvers: &self.resolvers,
            config: &self.config,
            engine: Some(self),
            doc_resolver: self.doc_resolver.as_deref(),
            depth,
            ref_depth: 0,
            ref_chain: &[],
            default_strategy: Some(self.config.default_error_strategy),
            cancel,
        };
        execute(root, &ctx)
    }

    /// Run each registered tag's attribute validation over a tree
    fn validate_tags(&self, node: &Node) -> Result<(), EngineError> {
        if let NodeKind::Tag { name, attrs, .. } = &node.kind {
            if let Some(resolver) = self.resolvers.get(name) {
                resolver.validate(attrs).map_err(|err| EngineError::ResolverFailed {
                    tag: name.clone(),
                    position: node.pos,
                    source: err,
                    hint: None,
                })?;
            }
        }
        match &node.kind {
            NodeKind::Root { children }
            | NodeKind::Tag { children, .. }
            | NodeKind::Block { children, .. }
            | NodeKind::For { children, .. } => {
                for child in children {
                    self.validate_tags(child)?;
                }
            }
            NodeKind::Conditional { branches } => {
                for branch in branches {
                    for child in &branch.children {
                        self.validate_tags(child)?;
                    }
                }
            }
            NodeKind::Switch { cases, .. } => {
                for case in cases {
                    for child in &case.children {
                        self.validate_tags(child)?;
                    }
                }
            }
            NodeKind::Text { .. } => {}
        }
        Ok(())
    }
}

/// Build a [`MapContext`] from JSON data.
///
/// An object becomes the top-level scope; any other JSON value is bound
/// under the reserved `value` key.
pub fn context_from_json(data: serde_json::Value) -> MapContext {
    match Value::from(data) {
        Value::Map(map) => MapContext::from_map(map),
        other => {
            let mut map = IndexMap::new();
            map.insert(reserved::VALUE.to_string(), other);
            MapContext::from_map(map)
        }
    }
}

impl SourceResolver for Engine {
    fn resolve_source(&self, name: &str) -> Option<String> {
        self.templates.get(name).cloned()
    }
}

impl TemplateExecutor for Engine {
    fn execute_template(
        &self,
        ctx: &ExecContext<'_>,
        name: &str,
        data: IndexMap<String, Value>,
    ) -> Result<String, EngineError> {
        let Some(source) = self.templates.get(name) else {
            return Err(EngineError::TemplateNotFound { name: name.to_string() });
        };
        let source = source.clone();
        let depth = data
            .get(reserved::DEPTH)
            .and_then(|v| match v {
                Value::Int(n) => Some(*n as usize),
                _ => None,
            })
            .unwrap_or(ctx.depth + 1);
        let scope = MapContext::from_map(data);
        let compiled = self.compile_unchecked(&source)?;
        self.execute_root(&compiled.root, &scope, depth, ctx.cancel)
    }

    fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn max_depth(&self) -> usize {
        self.config.max_include_depth
    }

    fn template_source(&self, name: &str) -> Option<String> {
        self.templates.get(name).cloned()
    }
}
