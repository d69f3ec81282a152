//! Byte-level lexer for prompty template sources.
//!
//! The lexer turns template source text into a flat token stream consumed by
//! `prompty-parser`. Tag delimiters are configurable (default `{~` / `~}`);
//! everything between tags is emitted as [`TokenKind::Text`] runs located
//! with `memchr` so large literal sections are skipped without a per-byte
//! scan.
//!
//! Scanning precedence per position:
//!
//! 1. A backslash-escaped open delimiter (`\{~`) emits a text token holding
//!    the literal delimiter.
//! 2. The block-close prefix (`{~/`) emits [`TokenKind::BlockClose`]
//!    followed by the tag name and close delimiter.
//! 3. The open delimiter (`{~`) emits [`TokenKind::OpenTag`] followed by the
//!    tag name, attributes, and either `/~}` or `~}`.
//! 4. Any other run of bytes up to the next boundary is a text token.
//!
//! # Usage
//!
//! ```rust
//! use prompty_lexer::{Lexer, TokenKind};
//!
//! let tokens = Lexer::new("Hello, {~prompty.var name=\"user\" /~}!")
//!     .tokenize()
//!     .unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Text);
//! assert_eq!(tokens[1].kind, TokenKind::OpenTag);
//! assert_eq!(tokens[2].value, "prompty.var");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod token;

pub use error::{LexerError, Result};
pub use prompty_position::Position;
pub use token::{Token, TokenKind};

use memchr::memmem;

/// Configuration for the lexer
#[derive(Debug, Clone)]
pub struct LexerConfig {
    /// Opening tag delimiter
    pub open_delim: String,
    /// Closing tag delimiter
    pub close_delim: String,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self { open_delim: "{~".to_string(), close_delim: "~}".to_string() }
    }
}

/// Delimiter-configurable template lexer
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    at: Position,
    config: LexerConfig,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer with default delimiters
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, LexerConfig::default())
    }

    /// Create a new lexer with custom delimiters
    pub fn with_config(input: &'a str, config: LexerConfig) -> Self {
        Self { input, bytes: input.as_bytes(), pos: 0, at: Position::start(), config }
    }

    /// Tokenize the entire input in one pass.
    ///
    /// The returned stream always ends with an [`TokenKind::Eof`] token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while self.pos < self.bytes.len() {
            self.scan_segment(&mut tokens)?;
        }
        tokens.push(Token::new(TokenKind::Eof, "", self.at));
        Ok(tokens)
    }

    /// Advance the byte cursor, keeping line/column in sync
    fn advance_to(&mut self, new_pos: usize) {
        debug_assert!(new_pos >= self.pos && new_pos <= self.input.len());
        self.at.advance_str(&self.input[self.pos..new_pos]);
        self.pos = new_pos;
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Scan one text run plus the tag (or escape) that terminates it
    fn scan_segment(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        let open = self.config.open_delim.clone();
        let run_start = self.pos;
        let run_at = self.at;

        let Some(rel) = memmem::find(&self.bytes[self.pos..], open.as_bytes()) else {
            // No more tags; the rest is one text token
            let text = &self.input[run_start..];
            self.advance_to(self.input.len());
            tokens.push(Token::new(TokenKind::Text, text, run_at));
            return Ok(());
        };

        let delim_pos = self.pos + rel;
        let escaped = delim_pos > run_start && self.bytes[delim_pos - 1] == b'\\';
        let text_end = if escaped { delim_pos - 1 } else { delim_pos };

        if text_end > run_start {
            let text = &self.input[run_start..text_end];
            self.advance_to(text_end);
            tokens.push(Token::new(TokenKind::Text, text, run_at));
        }

        if escaped {
            // The backslash and delimiter collapse into a literal delimiter
            let at = self.at;
            self.advance_to(delim_pos + open.len());
            tokens.push(Token::new(TokenKind::Text, open, at));
            return Ok(());
        }

        self.scan_tag(tokens)
    }

    /// Scan a complete tag starting at the open delimiter
    fn scan_tag(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        let open = self.config.open_delim.clone();
        let close = self.config.close_delim.clone();
        let open_pos = self.at;
        let after_open = self.pos + open.len();

        if self.bytes.get(after_open) == Some(&b'/') {
            // Block close: {~/name~}
            self.advance_to(after_open + 1);
            tokens.push(Token::new(TokenKind::BlockClose, format!("{open}/"), open_pos));
            self.skip_whitespace();
            let name = self.scan_name(open_pos, true)?;
            tokens.push(name);
            self.skip_whitespace();
            return self.scan_close_delim(tokens, open_pos, &close);
        }

        self.advance_to(after_open);
        tokens.push(Token::new(TokenKind::OpenTag, open, open_pos));
        self.skip_whitespace();
        let name = self.scan_name(open_pos, true)?;
        tokens.push(name);

        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                return Err(LexerError::UnterminatedTag { position: open_pos });
            }
            if self.rest().starts_with(&close) {
                let at = self.at;
                self.advance_to(self.pos + close.len());
                tokens.push(Token::new(TokenKind::CloseTag, close, at));
                return Ok(());
            }
            if self.bytes[self.pos] == b'/' && self.input[self.pos + 1..].starts_with(&close) {
                let at = self.at;
                self.advance_to(self.pos + 1 + close.len());
                tokens.push(Token::new(TokenKind::SelfClose, format!("/{close}"), at));
                return Ok(());
            }

            let attr = self.scan_name(open_pos, false)?;
            tokens.push(attr);
            self.skip_whitespace();

            match self.bytes.get(self.pos) {
                None => return Err(LexerError::UnterminatedTag { position: open_pos }),
                Some(b'=') => {
                    let at = self.at;
                    self.advance_to(self.pos + 1);
                    tokens.push(Token::new(TokenKind::Equals, "=", at));
                }
                Some(_) => {
                    return Err(LexerError::UnexpectedChar {
                        ch: self.current_char(),
                        position: self.at,
                    });
                }
            }

            self.skip_whitespace();
            let value = self.scan_attr_value(open_pos)?;
            tokens.push(value);
        }
    }

    /// Expect and emit the close delimiter after a block-close tag name
    fn scan_close_delim(
        &mut self,
        tokens: &mut Vec<Token>,
        open_pos: Position,
        close: &str,
    ) -> Result<()> {
        if self.pos >= self.bytes.len() {
            return Err(LexerError::UnterminatedTag { position: open_pos });
        }
        if !self.rest().starts_with(close) {
            return Err(LexerError::UnexpectedChar { ch: self.current_char(), position: self.at });
        }
        let at = self.at;
        self.advance_to(self.pos + close.len());
        tokens.push(Token::new(TokenKind::CloseTag, close, at));
        Ok(())
    }

    /// Scan a tag or attribute name.
    ///
    /// First byte must be an ASCII letter or underscore; the tail allows
    /// letters, digits, underscore, hyphen, and (for tag names only) dot.
    fn scan_name(&mut self, open_pos: Position, allow_dot: bool) -> Result<Token> {
        if self.pos >= self.bytes.len() {
            return Err(LexerError::UnterminatedTag { position: open_pos });
        }
        let name_pos = self.at;
        let first = self.bytes[self.pos];
        if !(first.is_ascii_alphabetic() || first == b'_') {
            return Err(LexerError::InvalidTagName { position: name_pos });
        }
        let start = self.pos;
        let mut end = self.pos + 1;
        while end < self.bytes.len() {
            let b = self.bytes[end];
            let ok = b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || (allow_dot && b == b'.');
            if !ok {
                break;
            }
            end += 1;
        }
        let name = &self.input[start..end];
        self.advance_to(end);
        let kind = if allow_dot { TokenKind::TagName } else { TokenKind::AttrName };
        Ok(Token::new(kind, name, name_pos))
    }

    /// Scan a quoted attribute value, resolving `\"`, `\'` and `\\`.
    ///
    /// Escapes of characters other than the active quote and the backslash
    /// are passed through literally.
    fn scan_attr_value(&mut self, open_pos: Position) -> Result<Token> {
        if self.pos >= self.bytes.len() {
            return Err(LexerError::UnterminatedTag { position: open_pos });
        }
        let quote = self.bytes[self.pos];
        if quote != b'\'' && quote != b'"' {
            return Err(LexerError::UnexpectedChar { ch: self.current_char(), position: self.at });
        }
        let quote_pos = self.at;
        self.advance_to(self.pos + 1);

        let mut value = String::new();
        loop {
            if self.pos >= self.bytes.len() {
                return Err(LexerError::UnterminatedString { position: quote_pos });
            }
            let b = self.bytes[self.pos];
            if b == quote {
                self.advance_to(self.pos + 1);
                return Ok(Token::new(TokenKind::AttrValue, value, quote_pos));
            }
            if b == b'\\' {
                match self.bytes.get(self.pos + 1) {
                    None => return Err(LexerError::UnterminatedString { position: quote_pos }),
                    Some(&next) if next == quote || next == b'\\' => {
                        value.push(next as char);
                        self.advance_to(self.pos + 2);
                    }
                    Some(_) => {
                        value.push('\\');
                        self.advance_to(self.pos + 1);
                    }
                }
                continue;
            }
            let ch = self.current_char();
            value.push(ch);
            self.advance_to(self.pos + ch.len_utf8());
        }
    }

    fn skip_whitespace(&mut self) {
        let mut end = self.pos;
        while end < self.bytes.len() && self.bytes[end].is_ascii_whitespace() {
            end += 1;
        }
        if end > self.pos {
            self.advance_to(end);
        }
    }

    fn current_char(&self) -> char {
        self.rest().chars().next().unwrap_or('\0')
    }
}
