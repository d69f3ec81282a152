//! Error types for template parsing.

use prompty_lexer::LexerError;
use prompty_position::Position;
use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while extracting frontmatter or building the tree
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// Tokenization failure
    #[error(transparent)]
    Lexer(#[from] LexerError),

    /// Token that cannot start or continue the current production
    #[error("unexpected {found} at {position}")]
    UnexpectedToken { found: String, position: Position },

    /// A specific token was required but something else was found
    #[error("expected {expected}, found {found} at {position}")]
    ExpectedToken { expected: String, found: String, position: Position },

    /// Closing tag name does not match the open tag
    #[error("mismatched closing tag: expected {expected}, found {found} at {position}")]
    MismatchedTag { expected: String, found: String, position: Position },

    /// A raw block opened inside another raw block
    #[error("raw blocks cannot be nested ({position})")]
    NestedRawBlock { position: Position },

    /// `prompty.if` or `prompty.elseif` without an eval attribute
    #[error("conditional branch at {position} requires an eval attribute")]
    CondMissingEval { position: Position },

    /// `prompty.else` carrying an eval attribute
    #[error("else branch at {position} cannot take an eval attribute")]
    CondInvalidElse { position: Position },

    /// A branch appearing after the else branch
    #[error("else must be the last branch of the conditional at {position}")]
    CondElseNotLast { position: Position },

    /// Conditional never closed
    #[error("conditional at {position} is not closed")]
    CondNotClosed { position: Position },

    /// `prompty.for` without an item attribute
    #[error("for loop at {position} requires an item attribute")]
    ForMissingItem { position: Position },

    /// `prompty.for` without an in attribute
    #[error("for loop at {position} requires an in attribute")]
    ForMissingIn { position: Position },

    /// `prompty.for` limit attribute is not a non-negative integer
    #[error("invalid for-loop limit {limit:?} at {position}")]
    ForInvalidLimit { limit: String, position: Position },

    /// Loop never closed
    #[error("for loop at {position} is not closed")]
    ForNotClosed { position: Position },

    /// `prompty.switch` without an eval attribute
    #[error("switch at {position} requires an eval attribute")]
    SwitchMissingEval { position: Position },

    /// A case without exactly one of value= or eval=
    #[error("switch case at {position} requires exactly one of value or eval")]
    SwitchMissingValue { position: Position },

    /// A case following the default case
    #[error("default must be the last case of the switch ({position})")]
    SwitchDefaultNotLast { position: Position },

    /// More than one default case
    #[error("switch at {position} has more than one default case")]
    SwitchDuplicateDefault { position: Position },

    /// A case never closed
    #[error("switch case at {position} is not closed")]
    SwitchCaseNotClosed { position: Position },

    /// Switch never closed
    #[error("switch at {position} is not closed")]
    SwitchNotClosed { position: Position },

    /// `prompty.block` without a name attribute
    #[error("block at {position} requires a name attribute")]
    BlockMissingName { position: Position },

    /// Frontmatter opened with `---` but never closed
    #[error("frontmatter opened at {position} is never closed")]
    FrontmatterUnclosed { position: Position },

    /// Legacy `{~prompty.config~}` block instead of YAML frontmatter
    #[error("legacy config block at {position}; use YAML frontmatter between --- lines")]
    LegacyConfigDetected { position: Position },
}

impl ParseError {
    /// Get the position where the error occurred
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lexer(err) => err.position(),
            ParseError::UnexpectedToken { position, .. }
            | ParseError::ExpectedToken { position, .. }
            | ParseError::MismatchedTag { position, .. }
            | ParseError::NestedRawBlock { position }
            | ParseError::CondMissingEval { position }
            | ParseError::CondInvalidElse { position }
            | ParseError::CondElseNotLast { position }
            | ParseError::CondNotClosed { position }
            | ParseError::ForMissingItem { position }
            | ParseError::ForMissingIn { position }
            | ParseError::ForInvalidLimit { position, .. }
            | ParseError::ForNotClosed { position }
            | ParseError::SwitchMissingEval { position }
            | ParseError::SwitchMissingValue { position }
            | ParseError::SwitchDefaultNotLast { position }
            | ParseError::SwitchDuplicateDefault { position }
            | ParseError::SwitchCaseNotClosed { position }
            | ParseError::SwitchNotClosed { position }
            | ParseError::BlockMissingName { position }
            | ParseError::FrontmatterUnclosed { position }
            | ParseError::LegacyConfigDetected { position } => *position,
        }
    }
}
