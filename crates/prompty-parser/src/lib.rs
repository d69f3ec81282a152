//! Recursive-descent parser for prompty templates.
//!
//! Turns template source into the [`prompty_ast::Node`] tree consumed by
//! the executor. Parsing handles the specialized productions for raw
//! blocks, comments, conditionals, loops, switches, and named blocks, and
//! records every tag's byte-exact source range for the keepraw error
//! strategy. YAML frontmatter is split off beforehand by
//! [`frontmatter::extract`].
//!
//! # Usage
//!
//! ```rust
//! use prompty_parser::Parser;
//!
//! let mut parser = Parser::new("Hello, {~prompty.var name=\"user\" /~}!");
//! let root = parser.parse().unwrap();
//! assert_eq!(
//!     root.to_sexp(),
//!     r#"(root (text "Hello, ") (tag prompty.var [name="user"]) (text "!"))"#
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod frontmatter;
mod parser;

#[cfg(test)]
mod parser_tests;

pub use error::{ParseError, ParseResult};
pub use frontmatter::{FrontmatterResult, extract as extract_frontmatter};
pub use parser::Parser;
pub use prompty_lexer::LexerConfig;

use prompty_ast::Node;

/// Parse a template body with default delimiters
pub fn parse(source: &str) -> ParseResult<Node> {
    Parser::new(source).parse()
}
