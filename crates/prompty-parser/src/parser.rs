//! Recursive-descent parser for prompty templates.

use prompty_ast::{Attributes, CondBranch, Node, NodeKind, SwitchCase, tags};
use prompty_lexer::{Lexer, LexerConfig, Token, TokenKind};
use prompty_position::Position;

use crate::error::{ParseError, ParseResult};

/// Why a child-sequence production stopped.
enum Stop {
    /// End of input reached
    Eof,
    /// A `{~/` close tag is next (not consumed)
    BlockClose,
    /// A branch-separator tag from the caller's stop set is next (not consumed)
    Branch(String),
}

/// Template parser.
///
/// Consumes the token stream produced by [`Lexer`] and builds the [`Node`]
/// tree. Each tag node records its byte-exact `raw_source` so a failing
/// resolver under the keepraw strategy can reproduce the original text.
pub struct Parser<'a> {
    source: &'a str,
    config: LexerConfig,
    tokens: Vec<Token>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser with default delimiters
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, LexerConfig::default())
    }

    /// Create a parser with custom delimiters
    pub fn with_config(source: &'a str, config: LexerConfig) -> Self {
        Parser { source, config, tokens: Vec::new(), cursor: 0 }
    }

    /// Parse the source into a root node
    pub fn parse(&mut self) -> ParseResult<Node> {
        self.tokens = Lexer::with_config(self.source, self.config.clone()).tokenize()?;
        self.cursor = 0;
        let (children, stop) = self.parse_children(&[])?;
        match stop {
            Stop::Eof => Ok(Node::new(NodeKind::Root { children }, Position::start())),
            Stop::BlockClose | Stop::Branch(_) => {
                let token = self.peek().clone();
                Err(ParseError::UnexpectedToken {
                    found: describe(&token),
                    position: token.position,
                })
            }
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    /// Tag name directly after the token at the cursor, if any
    fn peek_tag_name(&self) -> &str {
        match self.tokens.get(self.cursor + 1) {
            Some(tok) if tok.kind == TokenKind::TagName => &tok.value,
            _ => "",
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        let token = self.peek().clone();
        if token.kind != kind {
            return Err(ParseError::ExpectedToken {
                expected: expected.to_string(),
                found: describe(&token),
                position: token.position,
            });
        }
        Ok(self.advance())
    }

    /// Byte offset one past the end of a token
    fn end_of(token: &Token) -> usize {
        token.position.offset + token.value.len()
    }

    fn slice_from(&self, start: usize, end_token: &Token) -> String {
        self.source[start..Self::end_of(end_token)].to_string()
    }

    /// Parse a sequence of child nodes.
    ///
    /// Stops without consuming at end of input, at any `{~/` close tag, or
    /// at an open tag whose name is in `stops` (used for `elseif`/`else`
    /// branch separators).
    fn parse_children(&mut self, stops: &[&str]) -> ParseResult<(Vec<Node>, Stop)> {
        let mut children = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Text => {
                    let token = self.advance();
                    children.push(Node::text(token.value, token.position));
                }
                TokenKind::Eof => return Ok((children, Stop::Eof)),
                TokenKind::BlockClose => return Ok((children, Stop::BlockClose)),
                TokenKind::OpenTag => {
                    let name = self.peek_tag_name();
                    if stops.contains(&name) {
                        return Ok((children, Stop::Branch(name.to_string())));
                    }
                    if let Some(node) = self.parse_tag()? {
                        children.push(node);
                    }
                }
                _ => {
                    let token = self.peek().clone();
                    return Err(ParseError::UnexpectedToken {
                        found: describe(&token),
                        position: token.position,
                    });
                }
            }
        }
    }

    /// Parse one tag starting at its open delimiter.
    ///
    /// Returns `None` for constructs that produce no node (comments).
    fn parse_tag(&mut self) -> ParseResult<Option<Node>> {
        let open = self.advance();
        debug_assert_eq!(open.kind, TokenKind::OpenTag);
        let open_pos = open.position;
        let name = self.expect(TokenKind::TagName, "tag name")?.value;
        let (attrs, end_token) = self.parse_attrs()?;
        let self_close = end_token.kind == TokenKind::SelfClose;

        match name.as_str() {
            tags::RAW => self.parse_raw(open_pos, attrs, self_close, &end_token).map(Some),
            tags::COMMENT => {
                self.parse_comment(open_pos, self_close)?;
                Ok(None)
            }
            tags::IF => self.parse_conditional(open_pos, &attrs, self_close).map(Some),
            tags::FOR => self.parse_for(open_pos, &attrs, self_close).map(Some),
            tags::SWITCH => self.parse_switch(open_pos, &attrs, self_close).map(Some),
            tags::BLOCK => self.parse_block(open_pos, &attrs, self_close, &end_token).map(Some),
            tags::ELSEIF | tags::ELSE | tags::CASE | tags::CASE_DEFAULT => {
                Err(ParseError::UnexpectedToken {
                    found: format!("tag {name} outside its parent construct"),
                    position: open_pos,
                })
            }
            _ => self.finish_tag(open_pos, name, attrs, self_close, &end_token).map(Some),
        }
    }

    /// Parse `name=value` pairs up to the tag's closing delimiter.
    ///
    /// Duplicate attribute names keep the last value.
    fn parse_attrs(&mut self) -> ParseResult<(Attributes, Token)> {
        let mut attrs = Attributes::new();
        loop {
            match self.peek().kind {
                TokenKind::SelfClose | TokenKind::CloseTag => {
                    let end = self.advance();
                    return Ok((attrs, end));
                }
                TokenKind::AttrName => {
                    let name = self.advance();
                    self.expect(TokenKind::Equals, "'='")?;
                    let value = self.expect(TokenKind::AttrValue, "attribute value")?;
                    attrs.insert(name.value, value.value);
                }
                _ => {
                    let token = self.peek().clone();
                    return Err(ParseError::ExpectedToken {
                        expected: "attribute or tag close".to_string(),
                        found: describe(&token),
                        position: token.position,
                    });
                }
            }
        }
    }

    /// Consume `{~/name~}`, verifying the name, and return the close token
    fn expect_block_close(&mut self, expected_name: &str) -> ParseResult<Token> {
        self.expect(TokenKind::BlockClose, "closing tag")?;
        let name = self.expect(TokenKind::TagName, "tag name")?;
        if name.value != expected_name {
            return Err(ParseError::MismatchedTag {
                expected: expected_name.to_string(),
                found: name.value,
                position: name.position,
            });
        }
        self.expect(TokenKind::CloseTag, "tag close delimiter")
    }

    /// Generic tag: self-closing, or children up to the matching close tag
    fn finish_tag(
        &mut self,
        open_pos: Position,
        name: String,
        attrs: Attributes,
        self_close: bool,
        end_token: &Token,
    ) -> ParseResult<Node> {
        if self_close {
            let raw_source = self.slice_from(open_pos.offset, end_token);
            return Ok(Node::new(
                NodeKind::Tag {
                    name,
                    attrs,
                    children: Vec::new(),
                    self_close: true,
                    raw_content: None,
                    raw_source,
                },
                open_pos,
            ));
        }

        let (children, stop) = self.parse_children(&[])?;
        match stop {
            Stop::Eof => Err(ParseError::ExpectedToken {
                expected: format!("closing tag for {name}"),
                found: "end of input".to_string(),
                position: open_pos,
            }),
            Stop::BlockClose | Stop::Branch(_) => {
                let close = self.expect_block_close(&name)?;
                let raw_source = self.slice_from(open_pos.offset, &close);
                Ok(Node::new(
                    NodeKind::Tag {
                        name,
                        attrs,
                        children,
                        self_close: false,
                        raw_content: None,
                        raw_source,
                    },
                    open_pos,
                ))
            }
        }
    }

    /// Raw block: capture the body verbatim from the source bytes.
    ///
    /// The first `{~/prompty.raw~}` closes the block; a nested raw open is
    /// rejected.
    fn parse_raw(
        &mut self,
        open_pos: Position,
        attrs: Attributes,
        self_close: bool,
        end_token: &Token,
    ) -> ParseResult<Node> {
        if self_close {
            let raw_source = self.slice_from(open_pos.offset, end_token);
            return Ok(Node::new(
                NodeKind::Tag {
                    name: tags::RAW.to_string(),
                    attrs,
                    children: Vec::new(),
                    self_close: true,
                    raw_content: Some(String::new()),
                    raw_source,
                },
                open_pos,
            ));
        }

        let content_start = Self::end_of(end_token);
        let content_end;
        loop {
            match self.peek().kind {
                TokenKind::OpenTag if self.peek_tag_name() == tags::RAW => {
                    return Err(ParseError::NestedRawBlock { position: self.peek().position });
                }
                TokenKind::BlockClose if self.peek_tag_name() == tags::RAW => {
                    content_end = self.peek().position.offset;
                    break;
                }
                TokenKind::Eof => {
                    return Err(ParseError::ExpectedToken {
                        expected: format!("closing tag for {}", tags::RAW),
                        found: "end of input".to_string(),
                        position: open_pos,
                    });
                }
                _ => {
                    self.advance();
                }
            }
        }
        let close = self.expect_block_close(tags::RAW)?;
        Ok(Node::new(
            NodeKind::Tag {
                name: tags::RAW.to_string(),
                attrs,
                children: Vec::new(),
                self_close: false,
                raw_content: Some(self.source[content_start..content_end].to_string()),
                raw_source: self.slice_from(open_pos.offset, &close),
            },
            open_pos,
        ))
    }

    /// Comment block: parse the body for well-formedness and discard it
    fn parse_comment(&mut self, open_pos: Position, self_close: bool) -> ParseResult<()> {
        if self_close {
            return Ok(());
        }
        let (_, stop) = self.parse_children(&[])?;
        match stop {
            Stop::Eof => Err(ParseError::ExpectedToken {
                expected: format!("closing tag for {}", tags::COMMENT),
                found: "end of input".to_string(),
                position: open_pos,
            }),
            Stop::BlockClose | Stop::Branch(_) => {
                self.expect_block_close(tags::COMMENT)?;
                Ok(())
            }
        }
    }

    /// Conditional: `if` head, `elseif` separators, optional trailing `else`
    fn parse_conditional(
        &mut self,
        open_pos: Position,
        attrs: &Attributes,
        self_close: bool,
    ) -> ParseResult<Node> {
        let Some(head) = attrs.get("eval") else {
            return Err(ParseError::CondMissingEval { position: open_pos });
        };
        if self_close {
            let branch = CondBranch {
                condition: head.to_string(),
                children: Vec::new(),
                is_else: false,
                pos: open_pos,
            };
            return Ok(Node::new(NodeKind::Conditional { branches: vec![branch] }, open_pos));
        }

        let mut branches = Vec::new();
        let mut condition = head.to_string();
        let mut is_else = false;
        let mut branch_pos = open_pos;
        loop {
            let (children, stop) = self.parse_children(&[tags::ELSEIF, tags::ELSE])?;
            match stop {
                Stop::Eof => return Err(ParseError::CondNotClosed { position: open_pos }),
                Stop::BlockClose => {
                    branches.push(CondBranch {
                        condition: std::mem::take(&mut condition),
                        children,
                        is_else,
                        pos: branch_pos,
                    });
                    self.expect_block_close(tags::IF)?;
                    break;
                }
                Stop::Branch(name) => {
                    branches.push(CondBranch {
                        condition: std::mem::take(&mut condition),
                        children,
                        is_else,
                        pos: branch_pos,
                    });
                    let open = self.advance();
                    self.expect(TokenKind::TagName, "tag name")?;
                    let (branch_attrs, _) = self.parse_attrs()?;
                    if is_else {
                        return Err(ParseError::CondElseNotLast { position: open.position });
                    }
                    if name == tags::ELSEIF {
                        match branch_attrs.get("eval") {
                            Some(eval) => condition = eval.to_string(),
                            None => {
                                return Err(ParseError::CondMissingEval {
                                    position: open.position,
                                });
                            }
                        }
                    } else {
                        if branch_attrs.contains("eval") {
                            return Err(ParseError::CondInvalidElse { position: open.position });
                        }
                        is_else = true;
                    }
                    branch_pos = open.position;
                }
            }
        }
        Ok(Node::new(NodeKind::Conditional { branches }, open_pos))
    }

    /// For loop: `item` and `in` are required, `index` and `limit` optional
    fn parse_for(
        &mut self,
        open_pos: Position,
        attrs: &Attributes,
        self_close: bool,
    ) -> ParseResult<Node> {
        let Some(item_var) = attrs.get("item") else {
            return Err(ParseError::ForMissingItem { position: open_pos });
        };
        let Some(source_path) = attrs.get("in") else {
            return Err(ParseError::ForMissingIn { position: open_pos });
        };
        let index_var = attrs.get("index").map(str::to_string);
        let limit = match attrs.get("limit") {
            None => 0,
            Some(raw) => raw.parse::<usize>().map_err(|_| ParseError::ForInvalidLimit {
                limit: raw.to_string(),
                position: open_pos,
            })?,
        };

        let children = if self_close {
            Vec::new()
        } else {
            let (children, stop) = self.parse_children(&[])?;
            match stop {
                Stop::Eof => return Err(ParseError::ForNotClosed { position: open_pos }),
                Stop::BlockClose | Stop::Branch(_) => {
                    self.expect_block_close(tags::FOR)?;
                }
            }
            children
        };

        Ok(Node::new(
            NodeKind::For {
                item_var: item_var.to_string(),
                index_var,
                source_path: source_path.to_string(),
                limit,
                children,
            },
            open_pos,
        ))
    }

    /// Switch: only case and casedefault children; default unique and last
    fn parse_switch(
        &mut self,
        open_pos: Position,
        attrs: &Attributes,
        self_close: bool,
    ) -> ParseResult<Node> {
        let Some(expression) = attrs.get("eval") else {
            return Err(ParseError::SwitchMissingEval { position: open_pos });
        };
        let expression = expression.to_string();
        if self_close {
            return Ok(Node::new(NodeKind::Switch { expression, cases: Vec::new() }, open_pos));
        }

        let mut cases: Vec<SwitchCase> = Vec::new();
        let mut seen_default = false;
        loop {
            match self.peek().kind {
                TokenKind::Text => {
                    let token = self.peek().clone();
                    if token.value.chars().all(char::is_whitespace) {
                        self.advance();
                    } else {
                        return Err(ParseError::UnexpectedToken {
                            found: "text between switch cases".to_string(),
                            position: token.position,
                        });
                    }
                }
                TokenKind::Eof => {
                    return Err(ParseError::SwitchNotClosed { position: open_pos });
                }
                TokenKind::BlockClose => {
                    self.expect_block_close(tags::SWITCH)?;
                    break;
                }
                TokenKind::OpenTag => {
                    let name = self.peek_tag_name().to_string();
                    if name != tags::CASE && name != tags::CASE_DEFAULT {
                        return Err(ParseError::UnexpectedToken {
                            found: format!("tag {name} inside switch"),
                            position: self.peek().position,
                        });
                    }
                    let case = self.parse_case(&name, seen_default)?;
                    seen_default |= case.is_default;
                    cases.push(case);
                }
                _ => {
                    let token = self.peek().clone();
                    return Err(ParseError::UnexpectedToken {
                        found: describe(&token),
                        position: token.position,
                    });
                }
            }
        }
        Ok(Node::new(NodeKind::Switch { expression, cases }, open_pos))
    }

    fn parse_case(&mut self, name: &str, seen_default: bool) -> ParseResult<SwitchCase> {
        let open = self.advance();
        self.expect(TokenKind::TagName, "tag name")?;
        let (attrs, end_token) = self.parse_attrs()?;
        let case_pos = open.position;
        let is_default = name == tags::CASE_DEFAULT;

        if is_default && seen_default {
            return Err(ParseError::SwitchDuplicateDefault { position: case_pos });
        }
        if !is_default && seen_default {
            return Err(ParseError::SwitchDefaultNotLast { position: case_pos });
        }

        let (value, eval) = if is_default {
            (None, None)
        } else {
            let value = attrs.get("value").map(str::to_string);
            let eval = attrs.get("eval").map(str::to_string);
            if value.is_some() == eval.is_some() {
                return Err(ParseError::SwitchMissingValue { position: case_pos });
            }
            (value, eval)
        };

        let children = if end_token.kind == TokenKind::SelfClose {
            Vec::new()
        } else {
            let (children, stop) = self.parse_children(&[])?;
            match stop {
                Stop::Eof => {
                    return Err(ParseError::SwitchCaseNotClosed { position: case_pos });
                }
                Stop::BlockClose | Stop::Branch(_) => {
                    self.expect_block_close(name)?;
                }
            }
            children
        };

        Ok(SwitchCase { value, eval, children, is_default, pos: case_pos })
    }

    /// Named block slot, recognized structurally for inheritance
    fn parse_block(
        &mut self,
        open_pos: Position,
        attrs: &Attributes,
        self_close: bool,
        end_token: &Token,
    ) -> ParseResult<Node> {
        let Some(name) = attrs.get("name") else {
            return Err(ParseError::BlockMissingName { position: open_pos });
        };
        let name = name.to_string();

        if self_close {
            // A self-closing block is an empty slot
            let raw_source = self.slice_from(open_pos.offset, end_token);
            return Ok(Node::new(
                NodeKind::Block { name, children: Vec::new(), raw_source },
                open_pos,
            ));
        }

        let (children, stop) = self.parse_children(&[])?;
        match stop {
            Stop::Eof => Err(ParseError::ExpectedToken {
                expected: format!("closing tag for {}", tags::BLOCK),
                found: "end of input".to_string(),
                position: open_pos,
            }),
            Stop::BlockClose | Stop::Branch(_) => {
                let close = self.expect_block_close(tags::BLOCK)?;
                let raw_source = self.slice_from(open_pos.offset, &close);
                Ok(Node::new(NodeKind::Block { name, children, raw_source }, open_pos))
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Text => "text".to_string(),
        TokenKind::OpenTag => "tag open delimiter".to_string(),
        TokenKind::BlockClose => "closing tag".to_string(),
        TokenKind::TagName => format!("tag name {:?}", token.value),
        TokenKind::AttrName => format!("attribute {:?}", token.value),
        TokenKind::Equals => "'='".to_string(),
        TokenKind::AttrValue => "attribute value".to_string(),
        TokenKind::SelfClose => "self-close delimiter".to_string(),
        TokenKind::CloseTag => "tag close delimiter".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}
