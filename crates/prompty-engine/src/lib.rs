//! Template engine for LLM prompt construction.
//!
//! Templates mix literal text with `{~tag …~}` constructs: variables,
//! conditionals, loops, switches, includes, cross-template references, raw
//! blocks, comments, inheritance, and role-tagged messages. Output is a
//! flat string, or a structured message list extracted from embedded
//! markers.
//!
//! The pipeline: frontmatter strip → lex → parse → inheritance merge →
//! execute (expression evaluation + tag resolution with per-tag error
//! strategies) → optional message extraction.
//!
//! # Usage
//!
//! ```rust
//! use prompty_engine::{Engine, MapContext};
//!
//! let engine = Engine::with_defaults();
//! let mut data = MapContext::new();
//! data.insert("user", "Alice");
//!
//! let output = engine
//!     .render("Hello, {~prompty.var name=\"user\" /~}!", &data)
//!     .unwrap();
//! assert_eq!(output, "Hello, Alice!");
//! ```
//!
//! Role-tagged messages:
//!
//! ```rust
//! use prompty_engine::{Engine, MapContext, Role};
//!
//! let engine = Engine::with_defaults();
//! let source = "{~prompty.message role=\"system\"~}You are helpful.{~/prompty.message~}";
//! let messages = engine.render_messages(source, &MapContext::new()).unwrap();
//! assert_eq!(messages[0].role, Role::System);
//! assert_eq!(messages[0].content, "You are helpful.");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod config;
mod context;
mod engine;
mod error;
mod executor;
mod hints;
mod inheritance;
mod message;
mod registry;
pub mod resolvers;
mod strategy;
mod suggest;

pub use cancel::CancelToken;
pub use config::EngineConfig;
pub use context::{DocumentResolver, ExecContext, ScopedContext, TemplateExecutor, reserved};
pub use engine::{CompiledTemplate, Engine, context_from_json};
pub use error::{EngineError, InheritanceError, ResolveError, ResolveResult};
pub use executor::execute;
pub use inheritance::{SourceResolver, resolve_inheritance};
pub use message::{MessageInfo, Role, extract_messages, strip_markers};
pub use registry::{ResolverRegistry, TagResolver};
pub use strategy::ErrorStrategy;
pub use suggest::{find_similar, levenshtein};

// Re-exported for downstream convenience: the context and registry types
// most hosts touch when embedding the engine.
pub use prompty_funcs::{FuncError, FunctionRegistry};
pub use prompty_value::{ContextReader, MapContext, Value};
