//! Error types for the prompty lexer

use prompty_position::Position;
use thiserror::Error;

/// Result type for lexer operations
pub type Result<T> = std::result::Result<T, LexerError>;

/// Errors that can occur during lexing
#[derive(Debug, Clone, Error)]
pub enum LexerError {
    /// Tag opened but never closed before end of input
    #[error("unterminated tag starting at {position}")]
    UnterminatedTag { position: Position },

    /// Quoted attribute value never closed
    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    /// Tag or attribute name does not start with a letter or underscore
    #[error("invalid tag name at {position}")]
    InvalidTagName { position: Position },

    /// Character that cannot appear at this point of a tag
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },
}

impl LexerError {
    /// Get the position where the error occurred
    pub fn position(&self) -> Position {
        match self {
            LexerError::UnterminatedTag { position }
            | LexerError::UnterminatedString { position }
            | LexerError::InvalidTagName { position }
            | LexerError::UnexpectedChar { position, .. } => *position,
        }
    }
}
