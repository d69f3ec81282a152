//! Engine configuration.

use prompty_parser::LexerConfig;

use crate::strategy::ErrorStrategy;

/// Configuration for template processing.
///
/// Depth limits treat the configured maximum as the last allowed level; a
/// value of 0 disables the limit.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Opening tag delimiter
    pub open_delim: String,
    /// Closing tag delimiter
    pub close_delim: String,
    /// Maximum nesting depth of block tags during execution
    pub max_nesting_depth: usize,
    /// Maximum depth of the extends chain
    pub max_inheritance_depth: usize,
    /// Maximum depth of the reference chain
    pub max_ref_depth: usize,
    /// Maximum depth of include recursion
    pub max_include_depth: usize,
    /// Strategy applied when a failing tag carries no `onerror` attribute
    pub default_error_strategy: ErrorStrategy,
    /// Edit distance threshold for variable-name suggestions
    pub suggestion_edit_distance: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            open_delim: "{~".to_string(),
            close_delim: "~}".to_string(),
            max_nesting_depth: 100,
            max_inheritance_depth: 10,
            max_ref_depth: 10,
            max_include_depth: 10,
            default_error_strategy: ErrorStrategy::Throw,
            suggestion_edit_distance: 2,
        }
    }
}

impl EngineConfig {
    /// The lexer view of the delimiter configuration
    pub fn lexer_config(&self) -> LexerConfig {
        LexerConfig { open_delim: self.open_delim.clone(), close_delim: self.close_delim.clone() }
    }
}
