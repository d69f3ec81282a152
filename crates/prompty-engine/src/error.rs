//! Error types for tag resolution, execution, and inheritance.

use prompty_expr::ExprError;
use prompty_parser::ParseError;
use prompty_position::Position;
use thiserror::Error;

/// Result type for resolver operations
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Errors produced by tag resolvers.
///
/// Every variant is dispatched through the error-strategy table at the
/// executor's tag-resolution step; none aborts output on its own.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Tag requires a `name` attribute
    #[error("tag {tag} requires a name attribute")]
    MissingNameAttr { tag: String },

    /// Tag requires a `template` attribute
    #[error("tag {tag} requires a template attribute")]
    MissingTemplateAttr { tag: String },

    /// The execution context lacks a capability the resolver needs
    #[error("invalid execution context: {reason}")]
    InvalidContext { reason: String },

    /// No template executor is wired into the context
    #[error("no template engine available for include resolution")]
    EngineNotAvailable,

    /// The engine does not know a template by this name
    #[error("template {name:?} not found")]
    TemplateNotFound { name: String },

    /// Include recursion went past the configured maximum
    #[error("include depth {depth} exceeds maximum {max}")]
    DepthExceeded { depth: usize, max: usize },

    /// Variable lookup missed and no default was given.
    ///
    /// `available` carries either a near-miss suggestion or a truncated
    /// listing of the keys that are present.
    #[error("variable {name:?} not found{available}")]
    VariableNotFound { name: String, available: String },

    /// Environment variable empty while `required="true"`
    #[error("required environment variable {name:?} is not set")]
    EnvVarRequired { name: String },

    /// Message tag without a role attribute
    #[error("message tag requires a role attribute")]
    MessageMissingRole,

    /// Role outside system/user/assistant/tool
    #[error("invalid message role {role:?}")]
    MessageInvalidRole { role: String },

    /// The raw resolver was invoked; raw blocks are handled by the parser
    #[error("raw resolver invoked; raw blocks never reach resolution")]
    RawResolverCalled,

    /// Ref tag without a slug attribute
    #[error("ref tag requires a slug attribute")]
    RefMissingSlug,

    /// Slug does not match `[a-z][a-z0-9-]*`
    #[error("invalid ref slug {slug:?}")]
    RefInvalidSlug { slug: String },

    /// No document resolver is wired into the context
    #[error("no document resolver available for ref resolution")]
    RefNoResolver,

    /// The document store has no prompt under this slug
    #[error("ref {slug:?} not found")]
    RefNotFound { slug: String },

    /// Reference chain went past the configured maximum
    #[error("ref depth {depth} exceeds maximum {max}")]
    RefDepthExceeded { depth: usize, max: usize },

    /// Slug already on the active reference chain
    #[error("circular ref chain: {chain}")]
    RefCircular { chain: String },

    /// Second resolver registered for the same tag name
    #[error("resolver for tag {tag} is already registered")]
    ResolverAlreadyRegistered { tag: String },

    /// Execution was canceled
    #[error("execution canceled")]
    Cancelled,

    /// Failure from a nested execution or a host-supplied resolver
    #[error("{0}")]
    Other(String),
}

impl ResolveError {
    /// Key–value context for structured logging and host diagnostics
    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        match self {
            ResolveError::MissingNameAttr { tag } | ResolveError::MissingTemplateAttr { tag } => {
                vec![("tag", tag.clone())]
            }
            ResolveError::TemplateNotFound { name }
            | ResolveError::VariableNotFound { name, .. }
            | ResolveError::EnvVarRequired { name } => vec![("name", name.clone())],
            ResolveError::DepthExceeded { depth, max }
            | ResolveError::RefDepthExceeded { depth, max } => {
                vec![("depth", depth.to_string()), ("max", max.to_string())]
            }
            ResolveError::MessageInvalidRole { role } => vec![("role", role.clone())],
            ResolveError::RefInvalidSlug { slug } | ResolveError::RefNotFound { slug } => {
                vec![("slug", slug.clone())]
            }
            ResolveError::RefCircular { chain } => vec![("chain", chain.clone())],
            _ => Vec::new(),
        }
    }
}

/// Errors from executing a template tree
#[derive(Debug, Error)]
pub enum EngineError {
    /// Frontmatter extraction or parsing failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Inheritance resolution failure
    #[error(transparent)]
    Inheritance(#[from] InheritanceError),

    /// No template stored under the requested name
    #[error("template {name:?} not found")]
    TemplateNotFound { name: String },

    /// Block-tag nesting went past the configured maximum
    #[error("nesting depth {depth} exceeds maximum {max} at {position}")]
    MaxDepthExceeded { depth: usize, max: usize, position: Position },

    /// Tag name with no registered resolver
    #[error("unknown tag {name:?} at {position}")]
    UnknownTag { name: String, position: Position },

    /// A resolver failed under the throw strategy.
    ///
    /// `hint` carries one actionable suggestion when the failing tag
    /// defined neither `default=` nor `onerror=`.
    #[error("tag {tag} at {position} failed: {source}{}", format_hint(.hint))]
    ResolverFailed {
        tag: String,
        position: Position,
        #[source]
        source: ResolveError,
        hint: Option<String>,
    },

    /// An `eval=` expression failed under the throw strategy
    #[error("expression {expression:?} at {position} failed: {source}")]
    ExprFailed {
        expression: String,
        position: Position,
        #[source]
        source: ExprError,
    },
}

fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!("\n{hint}"),
        None => String::new(),
    }
}

impl EngineError {
    /// Get the position where the error occurred, when one is known
    pub fn position(&self) -> Option<Position> {
        match self {
            EngineError::Parse(err) => Some(err.position()),
            EngineError::Inheritance(err) => err.position(),
            EngineError::TemplateNotFound { .. } => None,
            EngineError::MaxDepthExceeded { position, .. }
            | EngineError::UnknownTag { position, .. }
            | EngineError::ResolverFailed { position, .. }
            | EngineError::ExprFailed { position, .. } => Some(*position),
        }
    }
}

/// Errors from resolving the extends chain and merging blocks
#[derive(Debug, Clone, Error)]
pub enum InheritanceError {
    /// More than one extends tag in a single template
    #[error("template declares more than one extends tag ({position})")]
    ExtendsMultiple { position: Position },

    /// Extends tag without a `template` attribute
    #[error("extends tag at {position} requires a template attribute")]
    ExtendsMissingTemplate { position: Position },

    /// Extends tag preceded by non-whitespace content
    #[error("extends tag at {position} must be the first content of the template")]
    ExtendsNotFirst { position: Position },

    /// Two blocks with the same name in one template
    #[error("duplicate block name {name:?} at {position}")]
    BlockDuplicateName { name: String, position: Position },

    /// `prompty.parent` outside any named block
    #[error("parent tag at {position} is only valid inside a named block")]
    ParentOutsideBlock { position: Position },

    /// Extends chain went past the configured maximum
    #[error("inheritance depth {depth} exceeds maximum {max}")]
    DepthExceeded { depth: usize, max: usize },

    /// A template extends itself, directly or through its ancestors
    #[error("circular inheritance chain: {}", chain.join(" -> "))]
    Circular { chain: Vec<String> },

    /// Parent template missing from the source resolver
    #[error("parent template {name:?} not found")]
    TemplateNotFound { name: String },

    /// A parent template failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl InheritanceError {
    /// Get the position where the error occurred, when one is known
    pub fn position(&self) -> Option<Position> {
        match self {
            InheritanceError::ExtendsMultiple { position }
            | InheritanceError::ExtendsMissingTemplate { position }
            | InheritanceError::ExtendsNotFirst { position }
            | InheritanceError::BlockDuplicateName { position, .. }
            | InheritanceError::ParentOutsideBlock { position } => Some(*position),
            InheritanceError::Parse(err) => Some(err.position()),
            _ => None,
        }
    }
}
