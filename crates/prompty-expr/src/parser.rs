//! Precedence-climbing parser for expressions.
//!
//! Binding strength, loosest first: `||`, `&&`, equality (`==` `!=`),
//! ordered comparison (`<` `>` `<=` `>=`), unary `!`, calls, primaries.

use prompty_value::Value;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ExprError, ExprResult};
use crate::token::{ExprToken, ExprTokenKind, tokenize};

/// Parse an expression string into an [`Expr`] tree
pub fn parse(source: &str) -> ExprResult<Expr> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ExprError::EmptyExpression);
    }
    let mut parser = ExprParser { tokens, cursor: 0 };
    let expr = parser.parse_or()?;
    if let Some(extra) = parser.tokens.get(parser.cursor) {
        return Err(ExprError::UnexpectedToken {
            found: format!("{:?}", extra.kind),
            at: extra.at,
        });
    }
    Ok(expr)
}

struct ExprParser {
    tokens: Vec<ExprToken>,
    cursor: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&ExprTokenKind> {
        self.tokens.get(self.cursor).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<ExprToken> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn parse_or(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&ExprTokenKind::Or) {
            self.cursor += 1;
            let right = self.parse_and()?;
            left = Expr::Binary { op: BinaryOp::Or, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.peek() == Some(&ExprTokenKind::And) {
            self.cursor += 1;
            let right = self.parse_equality()?;
            left = Expr::Binary { op: BinaryOp::And, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek() {
                Some(ExprTokenKind::Eq) => BinaryOp::Eq,
                Some(ExprTokenKind::Neq) => BinaryOp::Neq,
                _ => return Ok(left),
            };
            self.cursor += 1;
            let right = self.parse_comparison()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
    }

    fn parse_comparison(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(ExprTokenKind::Lt) => BinaryOp::Lt,
                Some(ExprTokenKind::Gt) => BinaryOp::Gt,
                Some(ExprTokenKind::Lte) => BinaryOp::Lte,
                Some(ExprTokenKind::Gte) => BinaryOp::Gte,
                _ => return Ok(left),
            };
            self.cursor += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
    }

    fn parse_unary(&mut self) -> ExprResult<Expr> {
        if self.peek() == Some(&ExprTokenKind::Not) {
            self.cursor += 1;
            let right = self.parse_unary()?;
            return Ok(Expr::Unary { op: UnaryOp::Not, right: Box::new(right) });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ExprResult<Expr> {
        let Some(token) = self.advance() else {
            return Err(ExprError::UnexpectedEof);
        };
        match token.kind {
            ExprTokenKind::Int(n) => Ok(Expr::Literal(Value::Int(n))),
            ExprTokenKind::Float(n) => Ok(Expr::Literal(Value::Float(n))),
            ExprTokenKind::Str(s) => Ok(Expr::Literal(Value::String(s))),
            ExprTokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            ExprTokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            ExprTokenKind::Nil => Ok(Expr::Literal(Value::Null)),
            ExprTokenKind::Ident(name) => {
                if self.peek() == Some(&ExprTokenKind::LParen) {
                    self.cursor += 1;
                    let args = self.parse_args()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Identifier(name))
                }
            }
            ExprTokenKind::LParen => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(t) if t.kind == ExprTokenKind::RParen => Ok(inner),
                    Some(t) => Err(ExprError::ExpectedRParen { at: t.at }),
                    None => Err(ExprError::UnexpectedEof),
                }
            }
            other => {
                Err(ExprError::UnexpectedToken { found: format!("{other:?}"), at: token.at })
            }
        }
    }

    /// Comma-separated call arguments up to the closing parenthesis
    fn parse_args(&mut self) -> ExprResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek() == Some(&ExprTokenKind::RParen) {
            self.cursor += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            match self.advance() {
                Some(t) if t.kind == ExprTokenKind::RParen => return Ok(args),
                Some(t) if t.kind == ExprTokenKind::Comma => {}
                Some(t) => return Err(ExprError::ExpectedRParen { at: t.at }),
                None => return Err(ExprError::UnexpectedEof),
            }
        }
    }
}
